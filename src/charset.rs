// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use crate::ast::{CharClass, CharRange};

pub const MAX_CODE_POINT: u32 = 0x10_FFFF;

impl CharRange {
    pub fn new(start: u32, end_included: u32) -> Self {
        CharRange {
            start,
            end_included,
        }
    }

    pub fn from_char(c: char) -> Self {
        CharRange::new(c as u32, c as u32)
    }
}

impl CharClass {
    /// Build a class, the ranges are sorted and merged so
    /// that lookups can use binary search.
    pub fn new(ranges: Vec<CharRange>, negated: bool) -> Self {
        CharClass {
            ranges: normalize(ranges),
            negated,
        }
    }

    /// Whether `c` falls into one of the ranges, regardless of negation.
    pub fn contains(&self, c: char) -> bool {
        let codepoint = c as u32;
        self.ranges
            .binary_search_by(|range| {
                if range.end_included < codepoint {
                    std::cmp::Ordering::Less
                } else if range.start > codepoint {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn matches(&self, c: char, ignore_case: bool) -> bool {
        let found = if ignore_case {
            self.contains(c)
                || simple_lowercase(c).is_some_and(|l| self.contains(l))
                || simple_uppercase(c).is_some_and(|u| self.contains(u))
        } else {
            self.contains(c)
        };

        found != self.negated
    }
}

/// Sort the ranges and merge the overlapping or adjacent ones.
pub fn normalize(mut ranges: Vec<CharRange>) -> Vec<CharRange> {
    ranges.sort_by_key(|range| (range.start, range.end_included));

    let mut merged: Vec<CharRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end_included.saturating_add(1) => {
                last.end_included = last.end_included.max(range.end_included);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// The code points NOT covered by `ranges`.
pub fn complement(ranges: &[CharRange]) -> Vec<CharRange> {
    let mut result = vec![];
    let mut next_start: u32 = 0;

    for range in normalize(ranges.to_vec()) {
        if range.start > next_start {
            result.push(CharRange::new(next_start, range.start - 1));
        }
        next_start = range.end_included.saturating_add(1);
    }

    if next_start <= MAX_CODE_POINT {
        result.push(CharRange::new(next_start, MAX_CODE_POINT));
    }

    result
}

pub fn add_char(ranges: &mut Vec<CharRange>, c: char) {
    ranges.push(CharRange::from_char(c));
}

pub fn add_range(ranges: &mut Vec<CharRange>, start: char, end_included: char) {
    ranges.push(CharRange::new(start as u32, end_included as u32));
}

pub fn add_preset_space(ranges: &mut Vec<CharRange>) {
    // https://developer.mozilla.org/en-US/docs/Web/JavaScript/Guide/Regular_expressions/Character_classes
    // [\f\n\r\t\v    -     　﻿]
    add_range(ranges, '\t', '\r'); // \t \n \v \f \r
    add_char(ranges, ' ');
    add_char(ranges, '\u{a0}');
    add_char(ranges, '\u{1680}');
    add_range(ranges, '\u{2000}', '\u{200a}');
    add_range(ranges, '\u{2028}', '\u{2029}');
    add_char(ranges, '\u{202f}');
    add_char(ranges, '\u{205f}');
    add_char(ranges, '\u{3000}');
    add_char(ranges, '\u{feff}');
}

pub fn add_preset_word(ranges: &mut Vec<CharRange>) {
    // [A-Za-z0-9_]
    add_range(ranges, 'A', 'Z');
    add_range(ranges, 'a', 'z');
    add_range(ranges, '0', '9');
    add_char(ranges, '_');
}

pub fn add_preset_digit(ranges: &mut Vec<CharRange>) {
    // [0-9]
    add_range(ranges, '0', '9');
}

/// Add the ranges of the shorthand class `\d`, `\D`, `\w`, `\W`, `\s` or `\S`.
/// The upper case (negative) forms are added as complements, so they
/// can be combined with other items inside `[...]`, e.g. `[\s\S]`.
pub fn add_preset(ranges: &mut Vec<CharRange>, name: char) {
    let mut items = vec![];
    match name.to_ascii_lowercase() {
        'd' => add_preset_digit(&mut items),
        'w' => add_preset_word(&mut items),
        's' => add_preset_space(&mut items),
        _ => unreachable!(),
    }

    if name.is_ascii_uppercase() {
        ranges.append(&mut complement(&items));
    } else {
        ranges.append(&mut items);
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub fn chars_equal(left: char, right: char, ignore_case: bool) -> bool {
    if left == right {
        return true;
    }

    if !ignore_case {
        return false;
    }

    if left.is_ascii() && right.is_ascii() {
        return left.eq_ignore_ascii_case(&right);
    }

    let lower_left = simple_lowercase(left).unwrap_or(left);
    let lower_right = simple_lowercase(right).unwrap_or(right);
    if lower_left == lower_right {
        return true;
    }

    let upper_left = simple_uppercase(left).unwrap_or(left);
    let upper_right = simple_uppercase(right).unwrap_or(right);
    upper_left == upper_right
}

// Case mappings that expand to several chars (e.g. 'ß' -> "SS")
// are ignored, only one-to-one mappings take part in folding.
fn simple_lowercase(c: char) -> Option<char> {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) if l != c => Some(l),
        _ => None,
    }
}

fn simple_uppercase(c: char) -> Option<char> {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) if u != c => Some(u),
        _ => None,
    }
}
