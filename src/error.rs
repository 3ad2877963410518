// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::{self, Display};

use crate::location::Location;

#[derive(Debug, PartialEq, Clone)]
pub enum RegexError {
    // Malformed pattern, with the offending range of the pattern.
    MessageWithLocation(String, Location),

    // The pattern ended in the middle of a construct,
    // e.g. a dangling `\`, an unclosed `[` or `(`.
    UnexpectedEndOfDocument(String),

    // A back-reference to a group number or name that does not exist.
    InvalidBackReference(String, Location),

    // Unknown or repeated flag letter.
    InvalidFlags(String),

    // The step or depth budget ran out before the search concluded.
    // This is "gave up", not "does not match".
    MatchBudgetExceeded(String),
}

impl RegexError {
    /// `true` for errors raised while compiling a pattern.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            RegexError::MessageWithLocation(..)
                | RegexError::UnexpectedEndOfDocument(_)
                | RegexError::InvalidBackReference(..)
        )
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            RegexError::MessageWithLocation(_, location)
            | RegexError::InvalidBackReference(_, location) => Some(location),
            _ => None,
        }
    }

    /// Render the error together with the pattern line it refers to,
    /// marking the offending range with carets, e.g.
    ///
    /// ```text
    /// Quantifier range is out of order.
    /// a{3,1}
    ///  ^^^^^
    /// ```
    pub fn print_with_source(&self, pattern: &str) -> String {
        match self {
            RegexError::MessageWithLocation(message, location)
            | RegexError::InvalidBackReference(message, location) => {
                let line_text = pattern.lines().nth(location.line).unwrap_or("");
                let indent = " ".repeat(location.column);
                let marker = "^".repeat(location.length.max(1));
                format!("{}\n{}\n{}{}", message, line_text, indent, marker)
            }
            RegexError::UnexpectedEndOfDocument(message) => {
                let last_line = pattern.lines().last().unwrap_or("");
                let indent = " ".repeat(last_line.chars().count());
                format!("{}\n{}\n{}^", message, last_line, indent)
            }
            _ => self.to_string(),
        }
    }
}

impl Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::MessageWithLocation(message, location) => {
                write!(f, "Syntax error at {}: {}", location, message)
            }
            RegexError::UnexpectedEndOfDocument(message) => {
                write!(f, "Unexpected end of pattern: {}", message)
            }
            RegexError::InvalidBackReference(message, location) => {
                write!(f, "Invalid back-reference at {}: {}", location, message)
            }
            RegexError::InvalidFlags(message) => write!(f, "Invalid flags: {}", message),
            RegexError::MatchBudgetExceeded(message) => {
                write!(f, "Match budget exceeded: {}", message)
            }
        }
    }
}

impl std::error::Error for RegexError {}
