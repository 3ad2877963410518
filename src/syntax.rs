// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

mod lexer;
mod parser;
mod token;

pub use parser::parse_from_str;
pub use parser::GROUP_NESTING_MAX;
pub use lexer::REPETITION_BOUND_MAX;
