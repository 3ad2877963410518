// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::borrow::Cow;

use crate::regex::Captures;

/// Produces the replacement text of a match.
///
/// Implemented for:
///
/// - `&str`, `String` and `&String`: a template, see [`expand`].
/// - [`NoExpand`]: a literal text, `$` has no special meaning.
/// - `FnMut(&Captures) -> T` where `T: AsRef<str>`: a callback.
pub trait Replacer {
    /// Appends the replacement of the current match to `dst`.
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String);

    /// A fixed replacement text, if any. When this returns `Some`,
    /// the caller can skip the expansion.
    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        None
    }
}

impl Replacer for &str {
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String) {
        expand(caps, self, dst);
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        no_expansion(self)
    }
}

impl Replacer for &String {
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String) {
        expand(caps, self, dst);
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        no_expansion(self)
    }
}

impl Replacer for String {
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String) {
        expand(caps, self, dst);
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        no_expansion(self)
    }
}

impl<F, T> Replacer for F
where
    F: FnMut(&Captures<'_, '_>) -> T,
    T: AsRef<str>,
{
    fn replace_append(&mut self, caps: &Captures<'_, '_>, dst: &mut String) {
        dst.push_str((*self)(caps).as_ref());
    }
}

/// Use the wrapped text as is, e.g. `NoExpand("$1")` inserts
/// the two chars `$1`.
#[derive(Debug, Clone, Copy)]
pub struct NoExpand<'t>(pub &'t str);

impl Replacer for NoExpand<'_> {
    fn replace_append(&mut self, _: &Captures<'_, '_>, dst: &mut String) {
        dst.push_str(self.0);
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.0))
    }
}

// A template without `$` is a literal text.
fn no_expansion<T: AsRef<str>>(template: &T) -> Option<Cow<'_, str>> {
    let s = template.as_ref();
    if s.contains('$') {
        None
    } else {
        Some(Cow::Borrowed(s))
    }
}

/// Expand the replacement template and append the result to `dst`.
///
/// | Template  | Inserts                                  |
/// |-----------|------------------------------------------|
/// | `$$`      | `$`                                      |
/// | `$&`      | the whole match                          |
/// | `` $` ``  | the text before the match                |
/// | `$'`      | the text after the match                 |
/// | `$n`      | group `n` (1-9)                          |
/// | `$nn`     | group `nn` (01-99)                       |
/// | `$<name>` | the named group                          |
///
/// An unset group inserts nothing. A `$` sequence that refers to
/// no group is copied as is.
pub fn expand(caps: &Captures<'_, '_>, mut template: &str, dst: &mut String) {
    let whole = caps.get_match();
    let text = caps.input();
    let number_of_groups = caps.len() - 1;

    while let Some(index) = template.find('$') {
        dst.push_str(&template[..index]);
        template = &template[index..];

        let rest = &template[1..];
        let (consumed, inserted) = match rest.chars().next() {
            Some('$') => (2, Some("$")),
            Some('&') => (2, Some(whole.as_str())),
            Some('`') => (2, Some(&text[..whole.start()])),
            Some('\'') => (2, Some(&text[whole.end()..])),
            Some('0'..='9') => match find_group_number(rest, number_of_groups) {
                Some((number, length)) => (1 + length, Some(group_value(caps, number))),
                None => (1, None),
            },
            Some('<') if caps.has_named_groups() => match rest.find('>') {
                Some(close) => {
                    let value = caps.name(&rest[1..close]).map_or("", |m| m.as_str());
                    (1 + close + 1, Some(value))
                }
                None => (1, None),
            },
            _ => (1, None),
        };

        match inserted {
            Some(value) => dst.push_str(value),
            None => dst.push('$'),
        }

        template = &template[consumed..];
    }

    dst.push_str(template);
}

// Returns the group number and the number of digits it takes.
// Two digits win when they name an existing group.
fn find_group_number(s: &str, number_of_groups: usize) -> Option<(usize, usize)> {
    let mut digits = s.chars().map_while(|c| c.to_digit(10)).map(|d| d as usize);
    let first = digits.next()?;

    if let Some(second) = digits.next() {
        let number = first * 10 + second;
        if (1..=number_of_groups).contains(&number) {
            return Some((number, 2));
        }
    }

    if (1..=number_of_groups).contains(&first) {
        Some((first, 1))
    } else {
        None
    }
}

fn group_value<'t>(caps: &Captures<'_, 't>, number: usize) -> &'t str {
    caps.get(number).map_or("", |m| m.as_str())
}
