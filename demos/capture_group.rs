// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use regex_backtrack::{Captures, Regex, RegexError};

pub fn main() -> Result<(), RegexError> {
    let re = Regex::new(r"#(?<red>[\da-fA-F]{2})(?<green>[\da-fA-F]{2})(?<blue>[\da-fA-F]{2})")?;
    let text = "The color is #ffbb33 and the background is #bbdd99.";

    // capture groups once
    if let Some(caps) = re.captures(text)? {
        println!("Found match: {}", &caps[0]);
        println!("Red: {}", &caps["red"]);
        println!("Green: {}", &caps["green"]);
        println!("Blue: {}", &caps["blue"]);
    } else {
        println!("No match found");
    }

    // capture groups all
    for caps in re.captures_iter(text) {
        let caps = caps?;
        for (name, value) in caps.iter_named() {
            println!("{}: {}", name, value.map_or("", |m| m.as_str()));
        }
    }

    // replace with a template and with a callback
    println!("{}", re.replace_all(text, "rgb($<red>, $<green>, $<blue>)")?);
    println!(
        "{}",
        re.replace_all(text, |caps: &Captures| caps[0].to_uppercase())?
    );

    // an invalid pattern reports where the problem is
    let pattern = r"(?<year>\d{4})-\k<month>";
    if let Err(e) = Regex::new(pattern) {
        println!("{}", e.print_with_source(pattern));
    }

    Ok(())
}
