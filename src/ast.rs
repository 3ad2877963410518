// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::ops::Range;

use crate::rulechecker::MatchLength;

/// A parsed pattern.
///
/// The AST is immutable once parsed, one `Program` serves any number
/// of match attempts, from any number of threads.
#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub root: Node,

    // The names of capture groups, index 0 is the whole match
    // and is never named. The length of this list is the size of
    // the capture table of every match attempt.
    pub capture_groups: Vec<Option<String>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    Literal(char),

    // `.`, excludes line terminators unless the dot-all flag is set.
    AnyChar,

    CharClass(CharClass),
    Anchor(AnchorKind),
    Group(Box<Group>),
    Quantifier(Box<Quantifier>),

    /**
     * Disjunction
     * https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Regular_expressions/Disjunction
     *
     * branches are tried strictly from left to right, the first branch
     * that lets the REST of the pattern succeed wins, e.g.
     * `jeff|jeffrey` against "jeffrey" yields "jeff".
     * */
    Alternation(Vec<Node>),

    // An empty sequence matches the empty string, e.g. `()` and `a|`.
    Sequence(Vec<Node>),

    BackReference(BackReference),
    LookAssertion(Box<LookAssertion>),
}

/// A set of code point ranges, sorted and merged by the parser.
#[derive(Debug, PartialEq, Clone)]
pub struct CharClass {
    pub ranges: Vec<CharRange>,
    pub negated: bool,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CharRange {
    pub start: u32,
    pub end_included: u32,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum AnchorKind {
    StringStart,     // `^` without the multiline flag
    StringEnd,       // `$` without the multiline flag
    LineStart,       // `^` with the multiline flag
    LineEnd,         // `$` with the multiline flag
    WordBoundary,    // `\b`
    NotWordBoundary, // `\B`
}

#[derive(Debug, PartialEq, Clone)]
pub struct Group {
    pub body: Node,
    pub capture: CaptureSpec,
}

#[derive(Debug, PartialEq, Clone)]
pub enum CaptureSpec {
    NonCapturing,
    Capturing(usize),
    Named(usize, String),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Quantifier {
    pub body: Node,
    pub min: usize,
    pub max: Option<usize>, // `None` for unbounded
    pub lazy: bool,

    // capture slots declared inside `body`, they are cleared
    // at the start of every repetition.
    pub inner_groups: Range<usize>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Direction {
    Ahead,
    Behind,
}

#[derive(Debug, PartialEq, Clone)]
pub struct LookAssertion {
    pub body: Node,
    pub direction: Direction,
    pub negated: bool,
    pub inner_groups: Range<usize>,

    // the static length of `body` in chars, it bounds
    // the start offsets a look-behind has to try.
    pub length: MatchLength,
}

/// `\N` or `\k<name>`, the index of named references
/// is resolved by the parser.
#[derive(Debug, PartialEq, Clone)]
pub struct BackReference {
    pub index: usize,
    pub name: Option<String>,
}

impl Program {
    pub fn number_of_capture_groups(&self) -> usize {
        self.capture_groups.len()
    }

    pub fn get_capture_group_name_by_index(&self, index: usize) -> Option<&str> {
        self.capture_groups
            .get(index)
            .and_then(|name| name.as_deref())
    }

    pub fn get_capture_group_index_by_name(&self, name: &str) -> Option<usize> {
        find_capture_group(&self.capture_groups, name)
    }

    /// `true` when every match has to start at offset 0,
    /// i.e. the pattern begins with `^` and the multiline flag is off.
    pub fn is_fixed_start(&self) -> bool {
        fn starts_with_string_start(node: &Node) -> bool {
            match node {
                Node::Anchor(AnchorKind::StringStart) => true,
                Node::Sequence(parts) => parts.first().is_some_and(starts_with_string_start),
                Node::Group(group) => starts_with_string_start(&group.body),
                Node::Alternation(branches) => {
                    !branches.is_empty() && branches.iter().all(starts_with_string_start)
                }
                _ => false,
            }
        }

        starts_with_string_start(&self.root)
    }
}

/// The slot of the group called `name` in a capture-group table.
pub fn find_capture_group(capture_groups: &[Option<String>], name: &str) -> Option<usize> {
    capture_groups
        .iter()
        .position(|item| item.as_deref() == Some(name))
}

impl Node {
    /// Nodes that consume exactly one char and declare no groups.
    pub fn is_single_char(&self) -> bool {
        matches!(self, Node::Literal(_) | Node::AnyChar | Node::CharClass(_))
    }

    /// Nodes that consume nothing and cannot be quantified.
    pub fn is_assertion(&self) -> bool {
        matches!(self, Node::Anchor(_))
            || matches!(self, Node::LookAssertion(look) if look.direction == Direction::Behind)
    }
}
