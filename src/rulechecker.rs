// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::ops::{Add, BitOr};

use crate::ast::Node;

/// The number of chars a node can consume, `max` is `None`
/// when there is no static upper bound.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MatchLength {
    pub min: usize,
    pub max: Option<usize>,
}

impl MatchLength {
    pub fn fixed(length: usize) -> Self {
        MatchLength {
            min: length,
            max: Some(length),
        }
    }

    pub fn variable(min: usize) -> Self {
        MatchLength { min, max: None }
    }

    /// The length of `min..=max` repetitions of `self`.
    pub fn repeat(self, min: usize, max: Option<usize>) -> Self {
        let max = match (self.max, max) {
            (Some(0), _) => Some(0),
            (Some(v), Some(n)) => v.checked_mul(n),
            _ => None,
        };

        MatchLength {
            min: self.min.saturating_mul(min),
            max,
        }
    }

    pub fn contains(&self, length: usize) -> bool {
        length >= self.min && self.max.map_or(true, |max| length <= max)
    }
}

// sequence: `a` then `b`
impl Add for MatchLength {
    type Output = MatchLength;

    fn add(self, rhs: Self) -> Self::Output {
        let max = match (self.max, rhs.max) {
            (Some(v0), Some(v1)) => v0.checked_add(v1),
            _ => None,
        };

        MatchLength {
            min: self.min.saturating_add(rhs.min),
            max,
        }
    }
}

// alternation: `a` or `b`
impl BitOr for MatchLength {
    type Output = MatchLength;

    fn bitor(self, rhs: Self) -> Self::Output {
        let max = match (self.max, rhs.max) {
            (Some(v0), Some(v1)) => Some(v0.max(v1)),
            _ => None,
        };

        MatchLength {
            min: self.min.min(rhs.min),
            max,
        }
    }
}

pub fn get_match_length(node: &Node) -> MatchLength {
    match node {
        Node::Literal(_) | Node::AnyChar | Node::CharClass(_) => MatchLength::fixed(1),
        Node::Anchor(_) | Node::LookAssertion(_) => MatchLength::fixed(0),
        Node::BackReference(_) => MatchLength::variable(0),
        Node::Group(group) => get_match_length(&group.body),
        Node::Quantifier(quantifier) => {
            get_match_length(&quantifier.body).repeat(quantifier.min, quantifier.max)
        }
        Node::Sequence(parts) => parts
            .iter()
            .map(get_match_length)
            .fold(MatchLength::fixed(0), |acc, item| acc + item),
        Node::Alternation(branches) => branches
            .iter()
            .map(get_match_length)
            .reduce(|acc, item| acc | item)
            .unwrap_or(MatchLength::fixed(0)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{flags::Flags, rulechecker::get_match_length, syntax::parse_from_str};

    use super::MatchLength;

    fn length_of(pattern: &str) -> MatchLength {
        let program = parse_from_str(pattern, &Flags::default()).unwrap();
        get_match_length(&program.root)
    }

    #[test]
    fn test_match_length() {
        assert_eq!(length_of("abc"), MatchLength::fixed(3));
        assert_eq!(length_of("a[0-9]."), MatchLength::fixed(3));
        assert_eq!(length_of("^a\\b$"), MatchLength::fixed(1));
        assert_eq!(length_of("a(?=bcd)"), MatchLength::fixed(1));
        assert_eq!(length_of(""), MatchLength::fixed(0));

        assert_eq!(length_of("\\d{3}"), MatchLength::fixed(3));
        assert_eq!(length_of("\\d{2,4}x"), MatchLength { min: 3, max: Some(5) });
        assert_eq!(length_of("a+"), MatchLength::variable(1));
        assert_eq!(length_of("(ab)*c"), MatchLength::variable(1));
        assert_eq!(length_of("(?:ab){0}"), MatchLength::fixed(0));

        assert_eq!(length_of("ab|cde|f"), MatchLength { min: 1, max: Some(3) });
        assert_eq!(length_of("a|b*"), MatchLength::variable(0));
        assert_eq!(length_of("(a)\\1"), MatchLength::variable(1));
    }

    #[test]
    fn test_match_length_contains() {
        let length = MatchLength { min: 2, max: Some(4) };
        assert!(!length.contains(1));
        assert!(length.contains(2));
        assert!(length.contains(4));
        assert!(!length.contains(5));

        assert!(MatchLength::variable(1).contains(1000));
    }
}
