// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// Syntax Summary:
//
// Meta characters and their meanings:
//
// - [ ]      Character set
// - [^ ]     Negated character set
// - {m}      Exact repetition (m times)
// - {m,n}    Repetition range (m to n times)
// - {m,}     At least m repetitions
// - (xyz)    Grouping
// - *        Zero or more repetitions
// - +        One or more repetitions
// - ?        Optional or lazy repetition
// - |        Logical OR
// - ^        Start assertion
// - $        End assertion
// - .        Any character except line terminators
// - \        Escape character for special symbols
//
// Escaped characters:
//
// - \t \n \r \v \f   Control characters
// - \0               Null character (not followed by a digit)
// - \cX              Control character of the ASCII letter X
// - \xHH             Code point 00..FF
// - \uHHHH           Code point 0000..FFFF, a surrogate pair is combined
// - \u{H...}         Any code point
//
// Preset character sets:
//
// - \w \W    Word characters [a-zA-Z0-9_] and the negation
// - \d \D    Digits [0-9] and the negation
// - \s \S    Whitespace and line terminators, and the negation
//
// Boundary assertions:
// - \b       Word boundary (backspace inside a charset)
// - \B       Not a word boundary
//
// Groups:
// - (?:...)       Non-capturing group
// - (?<name>...)  Named capture group
// - (?=...) (?!...) (?<=...) (?<!...)  Look-around assertions
//
// Backreferences:
// - \number  Backreference by group number, e.g., `\1`, `\12`
// - \k<name> Backreference by group name
//
// Without the unicode flag the lexer is lenient: a lone `]` or `}`,
// a `{` that does not begin a quantifier and an unknown escape such
// as `\y` are all plain chars. With the unicode flag they are errors.
// `\k` is a plain `k` too, as long as the pattern declares no group name.

use crate::{
    charwithposition::{chars_with_position, CharWithPosition},
    flags::Flags,
    location::Location,
    RegexError,
};

use super::token::{Repetition, Token, TokenWithRange};

pub const REPETITION_BOUND_MAX: usize = 65536;

pub fn lex_from_str(s: &str, flags: &Flags) -> Result<Vec<TokenWithRange>, RegexError> {
    let (chars, end_position) = chars_with_position(s);
    let mut lexer = Lexer::new(chars, end_position, flags.unicode);
    lexer.lex()
}

// `true` when a `(?<name>` appears outside of escapes and charsets.
fn declares_group_name(chars: &[CharWithPosition]) -> bool {
    let char_at = |index: usize| chars.get(index).map(|item| item.character);

    let mut index = 0;
    let mut in_charset = false;

    while let Some(c) = char_at(index) {
        match c {
            '\\' => index += 1,
            '[' => in_charset = true,
            ']' => in_charset = false,
            '(' if !in_charset
                && char_at(index + 1) == Some('?')
                && char_at(index + 2) == Some('<')
                && char_at(index + 3).is_some_and(|c| c != '=' && c != '!') =>
            {
                return true;
            }
            _ => {}
        }
        index += 1;
    }

    false
}

struct Lexer {
    chars: Vec<CharWithPosition>,
    index: usize,            // index of the next char
    last_position: Location, // last position consumed
    end_position: Location,
    unicode: bool,

    // `\k` begins a named back-reference, otherwise it is a plain `k`
    named_references: bool,
}

impl Lexer {
    fn new(chars: Vec<CharWithPosition>, end_position: Location, unicode: bool) -> Self {
        let named_references = unicode || declares_group_name(&chars);

        Self {
            chars,
            index: 0,
            last_position: Location::new_position(0, 0, 0),
            end_position,
            unicode,
            named_references,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let CharWithPosition {
            character,
            position,
        } = *self.chars.get(self.index)?;

        self.index += 1;
        self.last_position = position;
        Some(character)
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.chars
            .get(self.index + offset)
            .map(|item| item.character)
    }

    fn peek_char_and_equals(&self, offset: usize, expected_char: char) -> bool {
        self.peek_char(offset) == Some(expected_char)
    }

    fn peek_position(&self, offset: usize) -> Location {
        self.chars
            .get(self.index + offset)
            .map_or(self.end_position, |item| item.position)
    }

    fn save(&self) -> (usize, Location) {
        (self.index, self.last_position)
    }

    fn restore(&mut self, saved: (usize, Location)) {
        (self.index, self.last_position) = saved;
    }

    // the range from `start` to the last consumed char
    fn range_from(&self, start: &Location) -> Location {
        Location::from_position_pair_with_end_included(start, &self.last_position)
    }

    fn expect_char(&mut self, expected_char: char, char_description: &str) -> Result<(), RegexError> {
        match self.next_char() {
            Some(ch) if ch == expected_char => Ok(()),
            Some(_) => Err(RegexError::MessageWithLocation(
                format!("Expect char: {}.", char_description),
                self.last_position,
            )),
            None => Err(RegexError::UnexpectedEndOfDocument(format!(
                "Expect char: {}.",
                char_description
            ))),
        }
    }

    fn consume_lazy_mark(&mut self) -> bool {
        if self.peek_char_and_equals(0, '?') {
            self.next_char(); // consume '?'
            true
        } else {
            false
        }
    }
}

impl Lexer {
    fn lex(&mut self) -> Result<Vec<TokenWithRange>, RegexError> {
        let mut token_with_ranges = vec![];

        while let Some(current_char) = self.peek_char(0) {
            let start = self.peek_position(0);

            let token = match current_char {
                '[' => {
                    let mut twrs = self.lex_charset()?;
                    token_with_ranges.append(&mut twrs);
                    continue;
                }
                ']' | '}' => {
                    if self.unicode {
                        return Err(RegexError::MessageWithLocation(
                            format!("Lone '{}' is not allowed in unicode mode.", current_char),
                            Location::from_position_and_length(&start, 1),
                        ));
                    }

                    self.next_char();
                    Token::Char(current_char)
                }
                '{' => match self.lex_repetition()? {
                    Some(token) => token,
                    None if self.unicode => {
                        return Err(RegexError::MessageWithLocation(
                            "Incomplete quantifier.".to_owned(),
                            Location::from_position_and_length(&start, 1),
                        ));
                    }
                    None => {
                        self.next_char(); // consume '{'
                        Token::Char('{')
                    }
                },
                '(' if self.peek_char_and_equals(1, '?') => self.lex_group_head()?,
                '(' => {
                    self.next_char(); // consume '('
                    Token::GroupStart
                }
                ')' => {
                    self.next_char(); // consume ')'
                    Token::GroupEnd
                }
                '*' | '+' | '?' => {
                    self.next_char(); // consume notation
                    let lazy = self.consume_lazy_mark();

                    match (current_char, lazy) {
                        ('*', false) => Token::ZeroOrMore,
                        ('*', true) => Token::ZeroOrMoreLazy,
                        ('+', false) => Token::OneOrMore,
                        ('+', true) => Token::OneOrMoreLazy,
                        (_, false) => Token::Optional,
                        (_, true) => Token::OptionalLazy,
                    }
                }
                '^' => {
                    self.next_char(); // consume '^'
                    Token::StartAssertion
                }
                '$' => {
                    self.next_char(); // consume '$'
                    Token::EndAssertion
                }
                '.' => {
                    self.next_char(); // consume '.'
                    Token::Dot
                }
                '|' => {
                    self.next_char(); // consume '|'
                    Token::LogicOr
                }
                '\\' => self.lex_escaping(false)?,
                _ => {
                    self.next_char(); // consume current char
                    Token::Char(current_char)
                }
            };

            token_with_ranges.push(TokenWithRange::new(token, self.range_from(&start)));
        }

        Ok(token_with_ranges)
    }

    fn lex_group_head(&mut self) -> Result<Token, RegexError> {
        // (?...  //
        // ^  ^___// to here
        // |______// current char, validated

        let start = self.peek_position(0);

        self.next_char(); // consume '('
        self.next_char(); // consume '?'

        let token = match self.peek_char(0) {
            Some(':') => {
                self.next_char(); // consume ':'
                Token::NonCapturing
            }
            Some('=') => {
                self.next_char(); // consume '='
                Token::LookAhead
            }
            Some('!') => {
                self.next_char(); // consume '!'
                Token::LookAheadNegative
            }
            Some('<') if self.peek_char_and_equals(1, '=') => {
                self.next_char(); // consume '<'
                self.next_char(); // consume '='
                Token::LookBehind
            }
            Some('<') if self.peek_char_and_equals(1, '!') => {
                self.next_char(); // consume '<'
                self.next_char(); // consume '!'
                Token::LookBehindNegative
            }
            Some('<') => {
                let name = self.lex_identifier()?;
                Token::NamedCapture(name)
            }
            Some(_) => {
                return Err(RegexError::MessageWithLocation(
                    "Invalid group, expect \"(?:\", \"(?=\", \"(?!\", \"(?<=\", \"(?<!\" or \"(?<name>\"."
                        .to_owned(),
                    Location::from_position_and_length(&start, 3),
                ));
            }
            None => {
                return Err(RegexError::UnexpectedEndOfDocument(
                    "Incomplete group.".to_owned(),
                ));
            }
        };

        Ok(token)
    }

    fn lex_charset(&mut self) -> Result<Vec<TokenWithRange>, RegexError> {
        // [.....]?  //
        // ^      ^__// to here
        // |_________// current char, validated
        //
        // also `[^.....]`

        let mut token_with_ranges = vec![];

        let start = self.peek_position(0);
        self.next_char(); // consume '['

        let charset_start = if self.peek_char_and_equals(0, '^') {
            self.next_char(); // consume '^'
            Token::CharSetStartNegative
        } else {
            Token::CharSetStart
        };

        token_with_ranges.push(TokenWithRange::new(charset_start, self.range_from(&start)));

        loop {
            match self.peek_char(0) {
                Some(']') => break,
                Some(_) => {
                    let twr = self.lex_charset_item()?;
                    token_with_ranges.push(twr);
                }
                None => {
                    return Err(RegexError::UnexpectedEndOfDocument(
                        "Incomplete charset.".to_owned(),
                    ));
                }
            }
        }

        self.next_char(); // consume ']'

        token_with_ranges.push(TokenWithRange::from_position_and_length(
            Token::CharSetEnd,
            &self.last_position,
            1,
        ));

        Ok(token_with_ranges)
    }

    fn lex_charset_item(&mut self) -> Result<TokenWithRange, RegexError> {
        // a char, a preset charset or a char range, e.g.
        // [a-z]
        //  ^ ^__ // to here
        //  |____ // from here
        //
        // the `-` is a plain char when it is the first or
        // the last char in the charset, e.g. `[-a]`, `[a-]`.

        let first = self.lex_charset_atom()?;

        let is_range = self.peek_char_and_equals(0, '-')
            && self.peek_char(1).is_some_and(|c| c != ']');

        if !is_range {
            return Ok(first);
        }

        self.next_char(); // consume '-'
        let last = self.lex_charset_atom()?;
        let range = Location::from_range_pair(&first.range, &last.range);

        match (first.token, last.token) {
            (Token::Char(char_start), Token::Char(char_end)) => {
                if char_start > char_end {
                    return Err(RegexError::MessageWithLocation(
                        "Range out of order in charset.".to_owned(),
                        range,
                    ));
                }

                Ok(TokenWithRange::new(Token::CharRange(char_start, char_end), range))
            }
            _ => Err(RegexError::MessageWithLocation(
                "Expect a char for char range, e.g. \"a-z\".".to_owned(),
                range,
            )),
        }
    }

    fn lex_charset_atom(&mut self) -> Result<TokenWithRange, RegexError> {
        let start = self.peek_position(0);

        let token = if self.peek_char_and_equals(0, '\\') {
            self.lex_escaping(true)?
        } else {
            match self.next_char() {
                Some(c) => Token::Char(c),
                None => {
                    return Err(RegexError::UnexpectedEndOfDocument(
                        "Incomplete charset.".to_owned(),
                    ));
                }
            }
        };

        Ok(TokenWithRange::new(token, self.range_from(&start)))
    }

    fn lex_escaping(&mut self, in_charset: bool) -> Result<Token, RegexError> {
        // \xxxx?  //
        // ^    ^__// to here
        // |_______// current char, validated

        let start = self.peek_position(0);

        self.next_char(); // consume '\'

        let Some(current_char) = self.peek_char(0) else {
            // `\` | EOF
            return Err(RegexError::UnexpectedEndOfDocument(
                "Incomplete escape character sequence.".to_owned(),
            ));
        };

        let token = match current_char {
            // general escaped chars
            't' | 'n' | 'r' | 'v' | 'f' => {
                self.next_char();
                let c = match current_char {
                    't' => '\t',     // horizontal tabulation
                    'n' => '\n',     // line feed
                    'r' => '\r',     // carriage return
                    'v' => '\u{b}',  // vertical tabulation
                    _ => '\u{c}', // form feed
                };
                Token::Char(c)
            }
            '0' if !matches!(self.peek_char(1), Some('0'..='9')) => {
                self.next_char();
                Token::Char('\0')
            }
            '0' => {
                return Err(RegexError::MessageWithLocation(
                    "Octal escape sequences are not supported.".to_owned(),
                    Location::from_position_and_length(&start, 3),
                ));
            }
            'c' => match self.peek_char(1) {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    self.next_char(); // consume 'c'
                    self.next_char(); // consume letter
                    Token::Char(char::from(letter as u8 % 32))
                }
                _ => {
                    self.check_lenient_escape(&start, current_char)?;

                    // `\c` without a letter is a backslash, and
                    // the 'c' is lexed as a plain char afterwards.
                    Token::Char('\\')
                }
            },
            'x' => {
                self.next_char(); // consume 'x'

                match self.lex_hex_digits(2).and_then(char::from_u32) {
                    Some(c) => Token::Char(c),
                    None => {
                        self.check_lenient_escape(&start, current_char)?;
                        Token::Char('x')
                    }
                }
            }
            'u' => {
                self.next_char(); // consume 'u'

                if self.peek_char_and_equals(0, '{') {
                    Token::Char(self.unescape_unicode()?)
                } else if let Some(code_unit) = self.lex_hex_digits(4) {
                    Token::Char(self.unescape_code_unit(&start, code_unit)?)
                } else {
                    self.check_lenient_escape(&start, current_char)?;
                    Token::Char('u')
                }
            }
            // syntax chars
            '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
            | '/' => {
                self.next_char();
                Token::Char(current_char)
            }
            // preset charsets
            'w' | 'W' | 'd' | 'D' | 's' | 'S' => {
                self.next_char();
                Token::PresetCharSet(current_char)
            }
            'b' if in_charset => {
                // backspace
                self.next_char();
                Token::Char('\u{8}')
            }
            'B' if in_charset => {
                return Err(RegexError::MessageWithLocation(
                    "Boundary assertions are not supported in charset.".to_owned(),
                    Location::from_position_and_length(&start, 2),
                ));
            }
            'b' | 'B' => {
                self.next_char();
                Token::BoundaryAssertion(current_char)
            }
            '-' if in_charset => {
                self.next_char();
                Token::Char('-')
            }
            '1'..='9' if in_charset => {
                return Err(RegexError::MessageWithLocation(
                    "Back references are not supported in charset.".to_owned(),
                    Location::from_position_and_length(&start, 2),
                ));
            }
            '1'..='9' => {
                // back reference by index
                let num = self.lex_number().unwrap_or_default();
                Token::BackReferenceNumber(num)
            }
            'k' if !in_charset && self.named_references => {
                // back reference by name
                self.next_char(); // consume 'k'

                if self.peek_char_and_equals(0, '<') {
                    let name = self.lex_identifier()?;
                    Token::BackReferenceIdentifier(name)
                } else {
                    return Err(RegexError::MessageWithLocation(
                        "Missing the angle bracket \"<\" for group name.".to_owned(),
                        self.last_position.move_position_forward(),
                    ));
                }
            }
            _ => {
                self.check_lenient_escape(&start, current_char)?;
                self.next_char();
                Token::Char(current_char)
            }
        };

        Ok(token)
    }

    // Unknown escapes are plain chars unless the unicode flag is set.
    fn check_lenient_escape(&self, start: &Location, c: char) -> Result<(), RegexError> {
        if self.unicode {
            Err(RegexError::MessageWithLocation(
                format!("Unknown escape '\\{}' in unicode mode.", c),
                Location::from_position_and_length(start, 2),
            ))
        } else {
            Ok(())
        }
    }

    // Consume exactly `count` hex digits, or nothing at all.
    fn lex_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut value = 0;
        for offset in 0..count {
            let digit = self.peek_char(offset)?.to_digit(16)?;
            value = value * 16 + digit;
        }

        for _ in 0..count {
            self.next_char();
        }

        Some(value)
    }

    fn unescape_code_unit(&mut self, start: &Location, code_unit: u32) -> Result<char, RegexError> {
        // \uD83D\uDE00?  //
        //       ^     ^__// to here
        //       |________// current char
        //
        // a high surrogate followed by a low surrogate forms one code point.

        let mut codepoint = code_unit;

        if (0xD800..0xDC00).contains(&code_unit)
            && self.peek_char_and_equals(0, '\\')
            && self.peek_char_and_equals(1, 'u')
        {
            let saved = self.save();
            self.next_char(); // consume '\'
            self.next_char(); // consume 'u'

            match self.lex_hex_digits(4) {
                Some(low) if (0xDC00..0xE000).contains(&low) => {
                    codepoint = 0x10000 + ((code_unit - 0xD800) << 10) + (low - 0xDC00);
                }
                _ => self.restore(saved),
            }
        }

        char::from_u32(codepoint).ok_or_else(|| {
            RegexError::MessageWithLocation(
                format!("Lone surrogate \\u{:04X} is not supported.", code_unit),
                self.range_from(start),
            )
        })
    }

    fn unescape_unicode(&mut self) -> Result<char, RegexError> {
        // \u{6587}?  //
        //   ^     ^__// to here
        //   |________// current char, validated

        let start = self.peek_position(0);

        self.next_char(); // comsume char '{'

        let mut codepoint: u32 = 0;
        let mut digits = 0;

        loop {
            match self.next_char() {
                Some('}') => break,
                Some(previous_char) => match previous_char.to_digit(16) {
                    Some(digit) => {
                        codepoint = codepoint.saturating_mul(16).saturating_add(digit);
                        digits += 1;
                    }
                    None => {
                        return Err(RegexError::MessageWithLocation(
                            format!(
                                "Invalid character '{}' for unicode escape sequence.",
                                previous_char
                            ),
                            self.last_position,
                        ));
                    }
                },
                None => {
                    // EOF
                    return Err(RegexError::UnexpectedEndOfDocument(
                        "Incomplete unicode escape sequence.".to_owned(),
                    ));
                }
            }
        }

        let codepoint_range = self.range_from(&start);

        if digits == 0 {
            return Err(RegexError::MessageWithLocation(
                "Empty unicode code point.".to_owned(),
                codepoint_range,
            ));
        }

        // valid code point:
        // 0 to 0x10FFFF inclusive, except the surrogates
        //
        // ref:
        // https://doc.rust-lang.org/std/primitive.char.html
        char::from_u32(codepoint).ok_or(RegexError::MessageWithLocation(
            "Invalid unicode code point.".to_owned(),
            codepoint_range,
        ))
    }

    fn lex_number(&mut self) -> Option<usize> {
        // 123456N  //
        // ^     ^__// to here
        // |________// current char
        //
        // N = not a number || EOF
        //
        // the value saturates, huge numbers are rejected
        // later as out of range.

        let mut num: Option<usize> = None;

        while let Some(digit) = self.peek_char(0).and_then(|c| c.to_digit(10)) {
            let value = num.unwrap_or(0);
            num = Some(value.saturating_mul(10).saturating_add(digit as usize));
            self.next_char(); // consume digit
        }

        num
    }

    fn lex_identifier(&mut self) -> Result<String, RegexError> {
        // <name>?  //
        // ^     ^__// to here
        // |________// current char, validated

        self.next_char(); // consume '<'

        let mut name_string = String::new();

        loop {
            match self.peek_char(0) {
                Some(current_char) => match current_char {
                    '0'..='9' if name_string.is_empty() => {
                        return Err(RegexError::MessageWithLocation(
                            "Group name cannot start with a digit.".to_owned(),
                            self.peek_position(0),
                        ));
                    }
                    '0'..='9' | 'a'..='z' | 'A'..='Z' | '_' | '$' => {
                        name_string.push(current_char);
                        self.next_char(); // consume char
                    }
                    '\u{a0}'..='\u{d7ff}' | '\u{e000}'..='\u{10ffff}' => {
                        // non-ASCII letters, e.g. CJK chars
                        name_string.push(current_char);
                        self.next_char(); // consume char
                    }
                    '>' => {
                        // terminator char
                        break;
                    }
                    _ => {
                        return Err(RegexError::MessageWithLocation(
                            format!("Invalid char '{}' for identifier.", current_char),
                            self.peek_position(0),
                        ));
                    }
                },
                None => {
                    return Err(RegexError::UnexpectedEndOfDocument(
                        "Incomplete identifier.".to_owned(),
                    ));
                }
            }
        }

        if name_string.is_empty() {
            return Err(RegexError::MessageWithLocation(
                "Expect an identifier.".to_owned(),
                self.last_position.move_position_forward(),
            ));
        }

        self.expect_char('>', "angle bracket \">\"")?;

        Ok(name_string)
    }

    fn lex_repetition(&mut self) -> Result<Option<Token>, RegexError> {
        // {...}?  //
        // ^    ^__// to here
        // |_______// from here, validated
        //
        // returns `None` and consumes nothing when the brace
        // does not begin a quantifier, e.g. `{a}`, `{,3}`.

        let start = self.peek_position(0);
        let saved = self.save();

        self.next_char(); // consume '{'

        let Some(repetition) = self.lex_repetition_bounds() else {
            self.restore(saved);
            return Ok(None);
        };

        let range = self.range_from(&start);
        let (min, max) = repetition.bounds();

        if min > REPETITION_BOUND_MAX || max.is_some_and(|n| n > REPETITION_BOUND_MAX) {
            return Err(RegexError::MessageWithLocation(
                format!("Repetition bound exceeds {}.", REPETITION_BOUND_MAX),
                range,
            ));
        }

        if max.is_some_and(|n| min > n) {
            return Err(RegexError::MessageWithLocation(
                "Quantifier range is out of order.".to_owned(),
                range,
            ));
        }

        let lazy = self.consume_lazy_mark();
        Ok(Some(Token::Repetition(repetition, lazy)))
    }

    fn lex_repetition_bounds(&mut self) -> Option<Repetition> {
        let from = self.lex_number()?;

        match self.next_char()? {
            '}' => Some(Repetition::Specified(from)),
            ',' if self.peek_char_and_equals(0, '}') => {
                self.next_char(); // consume '}'
                Some(Repetition::AtLeast(from))
            }
            ',' => {
                let to = self.lex_number()?;
                if self.next_char()? == '}' {
                    Some(Repetition::Range(from, to))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        flags::Flags,
        location::Location,
        syntax::token::{Repetition, Token, TokenWithRange},
        RegexError,
    };

    use super::lex_from_str;

    fn lex_from_str_without_location(s: &str) -> Result<Vec<Token>, RegexError> {
        let tokens = lex_from_str(s, &Flags::default())?
            .into_iter()
            .map(|e| e.token)
            .collect::<Vec<Token>>();
        Ok(tokens)
    }

    fn lex_unicode_mode(s: &str) -> Result<Vec<Token>, RegexError> {
        let flags = Flags {
            unicode: true,
            ..Flags::default()
        };

        let tokens = lex_from_str(s, &flags)?
            .into_iter()
            .map(|e| e.token)
            .collect::<Vec<Token>>();
        Ok(tokens)
    }

    #[test]
    fn test_lex_char() {
        assert_eq!(lex_from_str_without_location("").unwrap(), vec![]);

        assert_eq!(
            lex_from_str_without_location("a文😊").unwrap(),
            vec![Token::Char('a'), Token::Char('文'), Token::Char('😊'),]
        );

        // general escaped chars
        assert_eq!(
            lex_from_str_without_location(r#"\t\r\n\v\f\0\\"#).unwrap(),
            vec![
                Token::Char('\t'),
                Token::Char('\r'),
                Token::Char('\n'),
                Token::Char('\u{b}'),
                Token::Char('\u{c}'),
                Token::Char('\0'),
                Token::Char('\\'),
            ]
        );

        // hex and unicode escapes
        assert_eq!(
            lex_from_str_without_location(r#"\x41文\u{1F60A}😊\cJ"#).unwrap(),
            vec![
                Token::Char('A'),
                Token::Char('文'),
                Token::Char('😊'),
                Token::Char('😊'),
                Token::Char('\n'),
            ]
        );

        // escaped syntax chars
        assert_eq!(
            lex_from_str_without_location(r#"\(\)\{\}\[\]\+\*\?\.\|\^\$\/"#).unwrap(),
            vec![
                Token::Char('('),
                Token::Char(')'),
                Token::Char('{'),
                Token::Char('}'),
                Token::Char('['),
                Token::Char(']'),
                Token::Char('+'),
                Token::Char('*'),
                Token::Char('?'),
                Token::Char('.'),
                Token::Char('|'),
                Token::Char('^'),
                Token::Char('$'),
                Token::Char('/'),
            ]
        );

        // location
        assert_eq!(
            lex_from_str(r#"a文\t\u{6587}"#, &Flags::default()).unwrap(),
            vec![
                TokenWithRange::from_position_and_length(
                    Token::Char('a'),
                    &Location::new_position(0, 0, 0),
                    1
                ),
                TokenWithRange::from_position_and_length(
                    Token::Char('文'),
                    &Location::new_position(1, 0, 1),
                    1
                ),
                TokenWithRange::from_position_and_length(
                    Token::Char('\t'),
                    &Location::new_position(2, 0, 2),
                    2
                ),
                TokenWithRange::from_position_and_length(
                    Token::Char('文'),
                    &Location::new_position(4, 0, 4),
                    8
                ),
            ]
        );

        // err: incomplete escape
        assert!(matches!(
            lex_from_str_without_location(r#"abc\"#),
            Err(RegexError::UnexpectedEndOfDocument(_))
        ));

        // err: invalid code point
        assert!(matches!(
            lex_from_str_without_location(r#"\u{110000}"#),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        // err: lone surrogate
        assert!(matches!(
            lex_from_str_without_location(r#"\uD83D"#),
            Err(RegexError::MessageWithLocation(_, _))
        ));
    }

    #[test]
    fn test_lex_lenient_escapes() {
        // unknown escapes are plain chars without the unicode flag
        assert_eq!(
            lex_from_str_without_location(r#"\y\-\x4\c1"#).unwrap(),
            vec![
                Token::Char('y'),
                Token::Char('-'),
                Token::Char('x'),
                Token::Char('4'),
                Token::Char('\\'),
                Token::Char('c'),
                Token::Char('1'),
            ]
        );

        // lone brackets and braces
        assert_eq!(
            lex_from_str_without_location("]}{a}{,3}").unwrap(),
            vec![
                Token::Char(']'),
                Token::Char('}'),
                Token::Char('{'),
                Token::Char('a'),
                Token::Char('}'),
                Token::Char('{'),
                Token::Char(','),
                Token::Char('3'),
                Token::Char('}'),
            ]
        );

        // err: the same patterns in unicode mode
        assert!(matches!(
            lex_unicode_mode(r#"\y"#),
            Err(RegexError::MessageWithLocation(
                _,
                Location {
                    index: 0,
                    line: 0,
                    column: 0,
                    length: 2
                }
            ))
        ));

        assert!(matches!(
            lex_unicode_mode("a]"),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        assert!(matches!(
            lex_unicode_mode("a{,3}"),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        assert!(matches!(
            lex_unicode_mode(r#"\x4"#),
            Err(RegexError::MessageWithLocation(_, _))
        ));
    }

    #[test]
    fn test_lex_notations() {
        assert_eq!(
            lex_from_str_without_location("a?b+c*x??y+?z*?").unwrap(),
            vec![
                Token::Char('a'),
                Token::Optional,
                Token::Char('b'),
                Token::OneOrMore,
                Token::Char('c'),
                Token::ZeroOrMore,
                Token::Char('x'),
                Token::OptionalLazy,
                Token::Char('y'),
                Token::OneOrMoreLazy,
                Token::Char('z'),
                Token::ZeroOrMoreLazy,
            ]
        );

        assert_eq!(
            lex_from_str_without_location("a{3}b{5,}c{7,11}d{0,1}?").unwrap(),
            vec![
                Token::Char('a'),
                Token::Repetition(Repetition::Specified(3), false),
                Token::Char('b'),
                Token::Repetition(Repetition::AtLeast(5), false),
                Token::Char('c'),
                Token::Repetition(Repetition::Range(7, 11), false),
                Token::Char('d'),
                Token::Repetition(Repetition::Range(0, 1), true),
            ]
        );

        assert_eq!(
            lex_from_str_without_location("^a.b|c$").unwrap(),
            vec![
                Token::StartAssertion,
                Token::Char('a'),
                Token::Dot,
                Token::Char('b'),
                Token::LogicOr,
                Token::Char('c'),
                Token::EndAssertion,
            ]
        );

        // err: out of order
        assert!(matches!(
            lex_from_str_without_location("a{3,1}"),
            Err(RegexError::MessageWithLocation(
                _,
                Location {
                    index: 1,
                    line: 0,
                    column: 1,
                    length: 5
                }
            ))
        ));

        // err: bound too large
        assert!(matches!(
            lex_from_str_without_location("a{1,65537}"),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        assert!(lex_from_str_without_location("a{65536}").is_ok());
    }

    #[test]
    fn test_lex_charset() {
        assert_eq!(
            lex_from_str_without_location("[abc]").unwrap(),
            vec![
                Token::CharSetStart,
                Token::Char('a'),
                Token::Char('b'),
                Token::Char('c'),
                Token::CharSetEnd,
            ]
        );

        assert_eq!(
            lex_from_str_without_location(r#"[^a-z\d-]"#).unwrap(),
            vec![
                Token::CharSetStartNegative,
                Token::CharRange('a', 'z'),
                Token::PresetCharSet('d'),
                Token::Char('-'),
                Token::CharSetEnd,
            ]
        );

        // `-` at the start, escaped `-`, and chains of ranges
        assert_eq!(
            lex_from_str_without_location(r#"[-a\-b0-9A-F]"#).unwrap(),
            vec![
                Token::CharSetStart,
                Token::Char('-'),
                Token::Char('a'),
                Token::Char('-'),
                Token::Char('b'),
                Token::CharRange('0', '9'),
                Token::CharRange('A', 'F'),
                Token::CharSetEnd,
            ]
        );

        // `a-b-c` is the range a-b followed by '-' and 'c'
        assert_eq!(
            lex_from_str_without_location("[a-b-c]").unwrap(),
            vec![
                Token::CharSetStart,
                Token::CharRange('a', 'b'),
                Token::Char('-'),
                Token::Char('c'),
                Token::CharSetEnd,
            ]
        );

        // escapes in charset
        assert_eq!(
            lex_from_str_without_location(r#"[\b\]\x20-\x7e.*]"#).unwrap(),
            vec![
                Token::CharSetStart,
                Token::Char('\u{8}'),
                Token::Char(']'),
                Token::CharRange(' ', '~'),
                Token::Char('.'),
                Token::Char('*'),
                Token::CharSetEnd,
            ]
        );

        // empty charsets
        assert_eq!(
            lex_from_str_without_location("[][^]").unwrap(),
            vec![
                Token::CharSetStart,
                Token::CharSetEnd,
                Token::CharSetStartNegative,
                Token::CharSetEnd,
            ]
        );

        // location
        assert_eq!(
            lex_from_str("[a-z]", &Flags::default()).unwrap(),
            vec![
                TokenWithRange::new(Token::CharSetStart, Location::new_range(0, 0, 0, 1)),
                TokenWithRange::new(Token::CharRange('a', 'z'), Location::new_range(1, 0, 1, 3)),
                TokenWithRange::new(Token::CharSetEnd, Location::new_range(4, 0, 4, 1)),
            ]
        );

        // err: range out of order
        assert!(matches!(
            lex_from_str_without_location("[z-a]"),
            Err(RegexError::MessageWithLocation(
                _,
                Location {
                    index: 1,
                    line: 0,
                    column: 1,
                    length: 3
                }
            ))
        ));

        // err: preset charset as range endpoint
        assert!(matches!(
            lex_from_str_without_location(r#"[a-\d]"#),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        // err: \B in charset
        assert!(matches!(
            lex_from_str_without_location(r#"[\B]"#),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        // err: incomplete charset
        assert!(matches!(
            lex_from_str_without_location("[abc"),
            Err(RegexError::UnexpectedEndOfDocument(_))
        ));
    }

    #[test]
    fn test_lex_group() {
        assert_eq!(
            lex_from_str_without_location("(a)(?:b)(?<year>c)").unwrap(),
            vec![
                Token::GroupStart,
                Token::Char('a'),
                Token::GroupEnd,
                Token::NonCapturing,
                Token::Char('b'),
                Token::GroupEnd,
                Token::NamedCapture("year".to_owned()),
                Token::Char('c'),
                Token::GroupEnd,
            ]
        );

        assert_eq!(
            lex_from_str_without_location("(?=a)(?!b)(?<=c)(?<!d)").unwrap(),
            vec![
                Token::LookAhead,
                Token::Char('a'),
                Token::GroupEnd,
                Token::LookAheadNegative,
                Token::Char('b'),
                Token::GroupEnd,
                Token::LookBehind,
                Token::Char('c'),
                Token::GroupEnd,
                Token::LookBehindNegative,
                Token::Char('d'),
                Token::GroupEnd,
            ]
        );

        // location
        assert_eq!(
            lex_from_str("(?<ab>x", &Flags::default()).unwrap()[0],
            TokenWithRange::new(
                Token::NamedCapture("ab".to_owned()),
                Location::new_range(0, 0, 0, 6)
            )
        );

        // err: unknown group kind
        assert!(matches!(
            lex_from_str_without_location("(?x)"),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        // err: invalid group name
        assert!(matches!(
            lex_from_str_without_location("(?<1a>x)"),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        assert!(matches!(
            lex_from_str_without_location("(?<a-b>x)"),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        // err: incomplete group name
        assert!(matches!(
            lex_from_str_without_location("(?<name"),
            Err(RegexError::UnexpectedEndOfDocument(_))
        ));
    }

    #[test]
    fn test_lex_assertion_and_back_reference() {
        assert_eq!(
            lex_unicode_mode(r#"\bA\B\1\12\k<name>"#).unwrap(),
            vec![
                Token::BoundaryAssertion('b'),
                Token::Char('A'),
                Token::BoundaryAssertion('B'),
                Token::BackReferenceNumber(1),
                Token::BackReferenceNumber(12),
                Token::BackReferenceIdentifier("name".to_owned()),
            ]
        );

        assert_eq!(
            lex_from_str_without_location(r#"\d\D\w\W\s\S"#).unwrap(),
            vec![
                Token::PresetCharSet('d'),
                Token::PresetCharSet('D'),
                Token::PresetCharSet('w'),
                Token::PresetCharSet('W'),
                Token::PresetCharSet('s'),
                Token::PresetCharSet('S'),
            ]
        );

        assert_eq!(
            lex_from_str_without_location(r#"(?<name>a)\k<name>"#).unwrap(),
            vec![
                Token::NamedCapture("name".to_owned()),
                Token::Char('a'),
                Token::GroupEnd,
                Token::BackReferenceIdentifier("name".to_owned()),
            ]
        );

        // without group names `\k` is a plain 'k'
        assert_eq!(
            lex_from_str_without_location(r#"\k<a>[(?<b>]\(?<c>"#).unwrap()[..4],
            [
                Token::Char('k'),
                Token::Char('<'),
                Token::Char('a'),
                Token::Char('>'),
            ]
        );

        // err: \k without name
        assert!(matches!(
            lex_from_str_without_location(r#"(?<a>x)\k"#),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        assert!(matches!(
            lex_unicode_mode(r#"\k"#),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        // err: octal escape
        assert!(matches!(
            lex_from_str_without_location(r#"\01"#),
            Err(RegexError::MessageWithLocation(_, _))
        ));

        // err: back reference in charset
        assert!(matches!(
            lex_from_str_without_location(r#"[\1]"#),
            Err(RegexError::MessageWithLocation(_, _))
        ));
    }
}
