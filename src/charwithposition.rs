// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::str::Chars;

use crate::location::Location;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CharWithPosition {
    pub character: char,
    pub position: Location,
}

impl CharWithPosition {
    pub fn new(character: char, position: Location) -> Self {
        Self {
            character,
            position,
        }
    }
}

/// Pairs every char of a pattern with its location.
///
/// Patterns are normally a single line, but `RegExp` sources built
/// from template strings may span lines, so line and column
/// are tracked as well.
pub struct CharsWithPositionIter<'a> {
    upstream: Chars<'a>,
    current_position: Location,
}

impl<'a> CharsWithPositionIter<'a> {
    pub fn new(upstream: Chars<'a>) -> Self {
        Self {
            upstream,
            current_position: Location::new_position(0, 0, 0),
        }
    }
}

impl Iterator for CharsWithPositionIter<'_> {
    type Item = CharWithPosition;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.upstream.next()?;
        let last_position = self.current_position;

        self.current_position.index += 1;

        if c == '\n' {
            self.current_position.line += 1;
            self.current_position.column = 0;
        } else {
            self.current_position.column += 1;
        }

        Some(CharWithPosition::new(c, last_position))
    }
}

/// Collect the chars of `s` together with their positions, plus the
/// position just past the last char (used to report "end of pattern").
pub fn chars_with_position(s: &str) -> (Vec<CharWithPosition>, Location) {
    let mut iter = CharsWithPositionIter::new(s.chars());
    let chars: Vec<CharWithPosition> = iter.by_ref().collect();
    (chars, iter.current_position)
}
