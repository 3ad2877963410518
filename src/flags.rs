// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{fmt::Display, str::FromStr};

use crate::RegexError;

// Mode flags:
//
// - g  global, iterate over all matches (`exec`, `test` and `replace` honor it)
// - i  case-insensitive
// - m  multiline, `^` and `$` also match around line terminators
// - s  dot-all, `.` also matches line terminators
// - u  unicode, strict escapes and no Annex-B leniency
// - y  sticky, matches only at the cursor position
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Flags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub sticky: bool,
}

impl Flags {
    /// `exec` and `test` read and update the cursor only when
    /// either `g` or `y` is present.
    pub fn is_stateful(&self) -> bool {
        self.global || self.sticky
    }
}

impl FromStr for Flags {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Flags::default();

        for c in s.chars() {
            let flag = match c {
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'y' => &mut flags.sticky,
                _ => {
                    return Err(RegexError::InvalidFlags(format!(
                        "Unknown flag '{}' in \"{}\".",
                        c, s
                    )));
                }
            };

            if *flag {
                return Err(RegexError::InvalidFlags(format!(
                    "Duplicated flag '{}' in \"{}\".",
                    c, s
                )));
            }

            *flag = true;
        }

        Ok(flags)
    }
}

impl Display for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pairs = [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.sticky, 'y'),
        ];

        let s: String = pairs
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, c)| *c)
            .collect();
        f.write_str(&s)
    }
}
