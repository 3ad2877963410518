// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use regex_backtrack::{Cursor, Regex, RegexError};

pub fn main() -> Result<(), RegexError> {
    let re = Regex::new(r"#[\da-fA-F]{6}")?;
    let text = "The color is #ffbb33 and the background is #bbdd99.";

    // find one
    if let Some(m) = re.find(text)? {
        println!("Found match: {}", m.as_str());
    } else {
        println!("No match found");
    }

    // find all
    for m in re.find_iter(text) {
        println!("Found match: {}", m?.as_str());
    }

    // step through the matches with a cursor
    let re = Regex::with_flags(r"#[\da-fA-F]{6}", "g")?;
    let mut cursor = Cursor::new();
    while let Some(caps) = re.exec(text, &mut cursor)? {
        println!("Found {} at {}, next search from {}", &caps[0], caps.start(), cursor.last_index);
    }

    Ok(())
}
