// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use regex_backtrack::{Regex, RegexBuilder, RegexError};

pub fn main() -> Result<(), RegexError> {
    let re = Regex::new(r"^\d{4}-\d{2}-\d{2}$")?;
    println!("{}", re.is_match("2025-04-22")?); // should be true
    println!("{}", re.is_match("04-22")?); // should be false

    // a catastrophic pattern gives up instead of running forever
    let re = RegexBuilder::new(r"^(a+)+$").step_limit(Some(100_000)).build()?;
    match re.is_match(&format!("{}b", "a".repeat(40))) {
        Ok(found) => println!("{}", found),
        Err(e) => println!("{}", e), // should be a budget error
    }

    Ok(())
}
