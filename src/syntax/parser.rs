// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use crate::{
    ast::{
        find_capture_group, AnchorKind, BackReference, CaptureSpec, CharClass, Direction, Group,
        LookAssertion, Node, Program, Quantifier,
    },
    charset::{add_char, add_preset, add_range},
    flags::Flags,
    location::Location,
    rulechecker::get_match_length,
    RegexError,
};

use super::{
    lexer::lex_from_str,
    token::{Token, TokenWithRange},
};

pub const GROUP_NESTING_MAX: usize = 250;

pub fn parse_from_str(s: &str, flags: &Flags) -> Result<Program, RegexError> {
    let tokens = lex_from_str(s, flags)?;
    let capture_groups = collect_capture_groups(&tokens)?;
    let mut parser = Parser::new(tokens, capture_groups, flags);
    parser.parse_program()
}

// Group numbers follow the order of the opening parentheses, so the
// whole table can be built from the tokens before parsing. This also
// lets a back-reference refer to a group that appears after it.
fn collect_capture_groups(tokens: &[TokenWithRange]) -> Result<Vec<Option<String>>, RegexError> {
    // slot 0 is the whole match
    let mut capture_groups: Vec<Option<String>> = vec![None];

    for TokenWithRange { token, range } in tokens {
        match token {
            Token::GroupStart => capture_groups.push(None),
            Token::NamedCapture(name) => {
                if find_capture_group(&capture_groups, name).is_some() {
                    return Err(RegexError::MessageWithLocation(
                        format!("Duplicated group name \"{}\".", name),
                        *range,
                    ));
                }

                capture_groups.push(Some(name.to_owned()));
            }
            _ => {}
        }
    }

    Ok(capture_groups)
}

struct Parser<'a> {
    tokens: Vec<TokenWithRange>,
    index: usize,
    last_range: Location,
    flags: &'a Flags,
    capture_groups: Vec<Option<String>>,
    next_capture_index: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(
        tokens: Vec<TokenWithRange>,
        capture_groups: Vec<Option<String>>,
        flags: &'a Flags,
    ) -> Self {
        Self {
            tokens,
            index: 0,
            last_range: Location::new_range(0, 0, 0, 0),
            flags,
            capture_groups,
            next_capture_index: 1,
            depth: 0,
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        let TokenWithRange { token, range } = self.tokens.get(self.index)?;
        self.index += 1;
        self.last_range = *range;
        Some(token.clone())
    }

    fn peek_token(&self, offset: usize) -> Option<&Token> {
        self.tokens
            .get(self.index + offset)
            .map(|TokenWithRange { token, .. }| token)
    }

    fn peek_range(&self) -> Location {
        self.tokens
            .get(self.index)
            .map_or(self.last_range, |TokenWithRange { range, .. }| *range)
    }

    // (min, max, lazy) of the next token when it is a quantifier.
    fn peek_quantifier(&self) -> Option<(usize, Option<usize>, bool)> {
        let quantifier = match self.peek_token(0)? {
            Token::ZeroOrMore => (0, None, false),
            Token::ZeroOrMoreLazy => (0, None, true),
            Token::OneOrMore => (1, None, false),
            Token::OneOrMoreLazy => (1, None, true),
            Token::Optional => (0, Some(1), false),
            Token::OptionalLazy => (0, Some(1), true),
            Token::Repetition(repetition, lazy) => {
                let (min, max) = repetition.bounds();
                (min, max, *lazy)
            }
            _ => return None,
        };

        Some(quantifier)
    }

    fn allocate_capture_index(&mut self) -> usize {
        let index = self.next_capture_index;
        self.next_capture_index += 1;
        index
    }
}

impl Parser<'_> {
    fn parse_program(&mut self) -> Result<Program, RegexError> {
        let root = self.parse_alternation()?;

        // the top level alternation stops only at ')'
        if self.peek_token(0).is_some() {
            return Err(RegexError::MessageWithLocation(
                "Unmatched right parenthesis \")\".".to_owned(),
                self.peek_range(),
            ));
        }

        Ok(Program {
            root,
            capture_groups: std::mem::take(&mut self.capture_groups),
        })
    }

    fn parse_alternation(&mut self) -> Result<Node, RegexError> {
        // sequence ... [ "|" sequence ]
        //
        // """
        // The | operator has the lowest precedence in a regular expression.
        // If you want to use a disjunction as a part of a bigger pattern,
        // you must group it.
        // """
        //
        // ref:
        // https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Regular_expressions/Disjunction

        let mut branches = vec![self.parse_sequence()?];

        while let Some(Token::LogicOr) = self.peek_token(0) {
            self.next_token(); // consume "|"
            branches.push(self.parse_sequence()?);
        }

        let node = if branches.len() == 1 {
            branches.swap_remove(0)
        } else {
            Node::Alternation(branches)
        };

        Ok(node)
    }

    fn parse_sequence(&mut self) -> Result<Node, RegexError> {
        // an empty sequence is allowed, e.g. `()`, `a|`.

        let mut parts = vec![];

        while let Some(token) = self.peek_token(0) {
            match token {
                // terminator
                Token::GroupEnd | Token::LogicOr => {
                    break;
                }
                _ => {
                    let node = self.parse_quantified()?;
                    parts.push(node);
                }
            }
        }

        let node = if parts.len() == 1 {
            parts.swap_remove(0)
        } else {
            Node::Sequence(parts)
        };

        Ok(node)
    }

    fn parse_quantified(&mut self) -> Result<Node, RegexError> {
        // atom [ notation ]

        let groups_before = self.next_capture_index;
        let mut node = self.parse_atom()?;

        let Some((min, max, lazy)) = self.peek_quantifier() else {
            return Ok(node);
        };

        self.next_token(); // consume notation

        let quantifiable = !node.is_assertion()
            && !(self.flags.unicode && matches!(node, Node::LookAssertion(_)));

        if !quantifiable {
            return Err(RegexError::MessageWithLocation(
                "The preceding assertion cannot be quantified.".to_owned(),
                self.last_range,
            ));
        }

        node = Node::Quantifier(Box::new(Quantifier {
            body: node,
            min,
            max,
            lazy,
            inner_groups: groups_before..self.next_capture_index,
        }));

        // e.g. `a**`, `a{2}{3}`
        if self.peek_quantifier().is_some() {
            return Err(RegexError::MessageWithLocation(
                "Nothing to repeat.".to_owned(),
                self.peek_range(),
            ));
        }

        Ok(node)
    }

    fn parse_atom(&mut self) -> Result<Node, RegexError> {
        // atoms:
        // - literal, dot, charset and preset charset
        // - anchor and boundary assertion
        // - group and look around assertion
        // - back reference

        let Some(token) = self.next_token() else {
            return Err(RegexError::UnexpectedEndOfDocument(
                "Expect an expression.".to_owned(),
            ));
        };

        let node = match token {
            Token::Char(c) => Node::Literal(c),
            Token::Dot => Node::AnyChar,
            Token::PresetCharSet(name) => {
                let mut ranges = vec![];
                add_preset(&mut ranges, name);
                Node::CharClass(CharClass::new(ranges, false))
            }
            Token::CharSetStart => self.parse_charset(false)?,
            Token::CharSetStartNegative => self.parse_charset(true)?,
            Token::StartAssertion => Node::Anchor(if self.flags.multiline {
                AnchorKind::LineStart
            } else {
                AnchorKind::StringStart
            }),
            Token::EndAssertion => Node::Anchor(if self.flags.multiline {
                AnchorKind::LineEnd
            } else {
                AnchorKind::StringEnd
            }),
            Token::BoundaryAssertion(name) => Node::Anchor(if name == 'b' {
                AnchorKind::WordBoundary
            } else {
                AnchorKind::NotWordBoundary
            }),
            Token::GroupStart => {
                let index = self.allocate_capture_index();
                self.parse_group(CaptureSpec::Capturing(index))?
            }
            Token::NamedCapture(name) => {
                let index = self.allocate_capture_index();
                self.parse_group(CaptureSpec::Named(index, name))?
            }
            Token::NonCapturing => self.parse_group(CaptureSpec::NonCapturing)?,
            Token::LookAhead => self.parse_look_assertion(Direction::Ahead, false)?,
            Token::LookAheadNegative => self.parse_look_assertion(Direction::Ahead, true)?,
            Token::LookBehind => self.parse_look_assertion(Direction::Behind, false)?,
            Token::LookBehindNegative => self.parse_look_assertion(Direction::Behind, true)?,
            Token::BackReferenceNumber(index) => {
                if index >= self.capture_groups.len() {
                    return Err(RegexError::InvalidBackReference(
                        format!("Group {} does not exist.", index),
                        self.last_range,
                    ));
                }

                Node::BackReference(BackReference { index, name: None })
            }
            Token::BackReferenceIdentifier(name) => {
                let Some(index) = find_capture_group(&self.capture_groups, &name) else {
                    return Err(RegexError::InvalidBackReference(
                        format!("Group \"{}\" does not exist.", name),
                        self.last_range,
                    ));
                };

                Node::BackReference(BackReference {
                    index,
                    name: Some(name),
                })
            }
            Token::ZeroOrMore
            | Token::ZeroOrMoreLazy
            | Token::OneOrMore
            | Token::OneOrMoreLazy
            | Token::Optional
            | Token::OptionalLazy
            | Token::Repetition(..) => {
                return Err(RegexError::MessageWithLocation(
                    "Nothing to repeat.".to_owned(),
                    self.last_range,
                ));
            }
            Token::GroupEnd | Token::LogicOr | Token::CharSetEnd | Token::CharRange(..) => {
                return Err(RegexError::MessageWithLocation(
                    "Unexpected token.".to_owned(),
                    self.last_range,
                ));
            }
        };

        Ok(node)
    }

    fn parse_group_body(&mut self) -> Result<Node, RegexError> {
        // "(" {alternation} ")"
        //  ^                 ^__ to here
        //  |____________________ current, the head has been consumed
        //
        // the head can also be "(?:", "(?<name>", "(?=" and so on.

        self.depth += 1;
        if self.depth > GROUP_NESTING_MAX {
            return Err(RegexError::MessageWithLocation(
                format!("Groups are nested deeper than {} levels.", GROUP_NESTING_MAX),
                self.last_range,
            ));
        }

        let body = self.parse_alternation()?;

        // the alternation stops only at ')' or at the end
        if self.next_token().is_none() {
            return Err(RegexError::UnexpectedEndOfDocument(
                "Incomplete group, expect the right parenthesis \")\".".to_owned(),
            ));
        }

        self.depth -= 1;
        Ok(body)
    }

    fn parse_group(&mut self, capture: CaptureSpec) -> Result<Node, RegexError> {
        let body = self.parse_group_body()?;
        Ok(Node::Group(Box::new(Group { body, capture })))
    }

    fn parse_look_assertion(&mut self, direction: Direction, negated: bool) -> Result<Node, RegexError> {
        let groups_before = self.next_capture_index;
        let body = self.parse_group_body()?;
        let length = get_match_length(&body);

        Ok(Node::LookAssertion(Box::new(LookAssertion {
            body,
            direction,
            negated,
            inner_groups: groups_before..self.next_capture_index,
            length,
        })))
    }

    fn parse_charset(&mut self, negated: bool) -> Result<Node, RegexError> {
        // "[" {char | char range | preset charset} "]"
        //  ^                                        ^__ to here
        //  |___________________________________________ current, validated

        let mut ranges = vec![];

        loop {
            match self.next_token() {
                Some(Token::Char(c)) => add_char(&mut ranges, c),
                Some(Token::CharRange(start, end_included)) => {
                    add_range(&mut ranges, start, end_included)
                }
                Some(Token::PresetCharSet(name)) => add_preset(&mut ranges, name),
                Some(Token::CharSetEnd) => break,
                Some(_) => {
                    return Err(RegexError::MessageWithLocation(
                        "Unexpected token in charset.".to_owned(),
                        self.last_range,
                    ));
                }
                None => {
                    return Err(RegexError::UnexpectedEndOfDocument(
                        "Incomplete charset.".to_owned(),
                    ));
                }
            }
        }

        Ok(Node::CharClass(CharClass::new(ranges, negated)))
    }
}
