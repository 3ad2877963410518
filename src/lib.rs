// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

mod charset;
mod charwithposition;
mod error;
mod location;
mod printer;
mod rulechecker;
mod syntax;

pub mod ast;
pub mod flags;
pub mod matcher;
pub mod regex;
pub mod replacer;

pub use error::RegexError;
pub use flags::Flags;
pub use location::Location;
pub use matcher::Limits;
pub use regex::{escape, CaptureMatches, Captures, Cursor, Match, Matches, Regex, RegexBuilder};
pub use replacer::{NoExpand, Replacer};
pub use syntax::{parse_from_str, GROUP_NESTING_MAX, REPETITION_BOUND_MAX};
