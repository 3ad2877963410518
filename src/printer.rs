// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// Print the AST back to pattern text. Parsing the printed text
// gives the same AST.

use std::fmt::{self, Display};

use crate::ast::{
    AnchorKind, BackReference, CaptureSpec, CharClass, Direction, Group, LookAssertion, Node,
    Program, Quantifier,
};

/// Chars that have to be escaped to be matched literally.
pub fn is_syntax_char(c: char) -> bool {
    matches!(
        c,
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '/'
    )
}

fn write_char(f: &mut fmt::Formatter<'_>, c: char, in_charset: bool) -> fmt::Result {
    match c {
        '\t' => f.write_str("\\t"),
        '\n' => f.write_str("\\n"),
        '\r' => f.write_str("\\r"),
        '\u{b}' => f.write_str("\\v"),
        '\u{c}' => f.write_str("\\f"),
        '\u{8}' if in_charset => f.write_str("\\b"),
        '\\' | ']' | '[' | '-' | '^' if in_charset => write!(f, "\\{}", c),
        _ if !in_charset && is_syntax_char(c) => write!(f, "\\{}", c),
        _ if c.is_control() => write!(f, "\\u{{{:x}}}", c as u32),
        _ => write!(f, "{}", c),
    }
}

fn write_code_point(f: &mut fmt::Formatter<'_>, codepoint: u32) -> fmt::Result {
    match char::from_u32(codepoint) {
        Some(c) => write_char(f, c, true),
        None => write!(f, "\\u{{{:x}}}", codepoint),
    }
}

impl Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.negated { "[^" } else { "[" })?;

        for range in &self.ranges {
            write_code_point(f, range.start)?;
            if range.end_included != range.start {
                f.write_str("-")?;
                write_code_point(f, range.end_included)?;
            }
        }

        f.write_str("]")
    }
}

impl Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorKind::StringStart | AnchorKind::LineStart => f.write_str("^"),
            AnchorKind::StringEnd | AnchorKind::LineEnd => f.write_str("$"),
            AnchorKind::WordBoundary => f.write_str("\\b"),
            AnchorKind::NotWordBoundary => f.write_str("\\B"),
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.capture {
            CaptureSpec::NonCapturing => write!(f, "(?:{})", self.body),
            CaptureSpec::Capturing(_) => write!(f, "({})", self.body),
            CaptureSpec::Named(_, name) => write!(f, "(?<{}>{})", name, self.body),
        }
    }
}

impl Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the parser only quantifies atoms, other bodies need a group
        match &self.body {
            Node::Sequence(_) | Node::Alternation(_) | Node::Quantifier(_) => {
                write!(f, "(?:{})", self.body)?
            }
            _ => write!(f, "{}", self.body)?,
        }

        match (self.min, self.max) {
            (0, None) => f.write_str("*")?,
            (1, None) => f.write_str("+")?,
            (0, Some(1)) => f.write_str("?")?,
            (m, None) => write!(f, "{{{},}}", m)?,
            (m, Some(n)) if m == n => write!(f, "{{{}}}", m)?,
            (m, Some(n)) => write!(f, "{{{},{}}}", m, n)?,
        }

        if self.lazy {
            f.write_str("?")?;
        }

        Ok(())
    }
}

impl Display for LookAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = match (self.direction, self.negated) {
            (Direction::Ahead, false) => "(?=",
            (Direction::Ahead, true) => "(?!",
            (Direction::Behind, false) => "(?<=",
            (Direction::Behind, true) => "(?<!",
        };

        write!(f, "{}{})", head, self.body)
    }
}

impl Display for BackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "\\k<{}>", name),
            None => write!(f, "\\{}", self.index),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(c) => write_char(f, *c, false),
            Node::AnyChar => f.write_str("."),
            Node::CharClass(class) => write!(f, "{}", class),
            Node::Anchor(anchor) => write!(f, "{}", anchor),
            Node::Group(group) => write!(f, "{}", group),
            Node::Quantifier(quantifier) => write!(f, "{}", quantifier),
            Node::Alternation(branches) => {
                let s: Vec<String> = branches.iter().map(|e| e.to_string()).collect();
                f.write_str(&s.join("|"))
            }
            Node::Sequence(parts) => {
                let mut after_number = false;

                for part in parts {
                    let text = if matches!(part, Node::Alternation(_)) {
                        format!("(?:{})", part)
                    } else {
                        part.to_string()
                    };

                    // `\1` followed by `0` would read as `\10`
                    match text.chars().next() {
                        Some(c) if after_number && c.is_ascii_digit() => {
                            write!(f, "\\x{:02x}{}", c as u32, &text[1..])?
                        }
                        _ => f.write_str(&text)?,
                    }

                    after_number = matches!(
                        part,
                        Node::BackReference(BackReference { name: None, .. })
                    );
                }
                Ok(())
            }
            Node::BackReference(back_reference) => write!(f, "{}", back_reference),
            Node::LookAssertion(look) => write!(f, "{}", look),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
