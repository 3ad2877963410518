// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use pretty_assertions::assert_eq;
use regex_backtrack::{Captures, Cursor, Flags, NoExpand, Regex, RegexError};

#[test]
fn test_properties() {
    let re = Regex::with_flags("[bt]at", "i").unwrap();
    let flags = re.flags();
    assert!(!flags.global);
    assert!(flags.ignore_case);
    assert!(!flags.multiline);
    assert!(!flags.sticky);
    assert!(!flags.unicode);
    assert_eq!(re.as_str(), "[bt]at");
    assert_eq!(flags.to_string(), "i");
    assert_eq!(re.to_string(), "/[bt]at/i");

    let flags: Flags = "yusmig".parse().unwrap();
    assert_eq!(flags.to_string(), "gimsuy");
}

#[test]
fn test_fresh_cursor_per_call() {
    let re = Regex::with_flags("cat", "gi").unwrap();

    // a shared cursor moves on, so every second call fails
    let mut cursor = Cursor::new();
    let results: Vec<bool> = (0..4)
        .map(|_| re.test("catastrophe", &mut cursor).unwrap())
        .collect();
    assert_eq!(results, vec![true, false, true, false]);

    // a fresh cursor always starts over
    for _ in 0..4 {
        assert!(re.test("catastrophe", &mut Cursor::new()).unwrap());
    }
}

#[test]
fn test_exec_result() {
    let text = "mom and dad and baby";
    let re = Regex::with_flags("mom( and dad( and baby)?)?", "gi").unwrap();
    let caps = re.exec(text, &mut Cursor::new()).unwrap().unwrap();

    assert_eq!(caps.start(), 0);
    assert_eq!(caps.input(), text);
    assert_eq!(&caps[0], "mom and dad and baby");
    assert_eq!(&caps[1], " and dad and baby");
    assert_eq!(&caps[2], " and baby");
}

#[test]
fn test_exec_without_global() {
    let text = "cat, bat, sat, fat";
    let re = Regex::new(".at").unwrap();
    let mut cursor = Cursor::new();

    for _ in 0..2 {
        let caps = re.exec(text, &mut cursor).unwrap().unwrap();
        assert_eq!((caps.start(), &caps[0], cursor.last_index), (0, "cat", 0));
    }
}

#[test]
fn test_exec_with_global() {
    let text = "cat, bat, sat, fat";
    let re = Regex::with_flags(".at", "g").unwrap();
    let mut cursor = Cursor::new();

    let mut items = vec![];
    while let Some(caps) = re.exec(text, &mut cursor).unwrap() {
        items.push((caps.start(), caps[0].to_owned(), cursor.last_index));
    }

    assert_eq!(
        items,
        vec![
            (0, "cat".to_owned(), 3),
            (5, "bat".to_owned(), 8),
            (10, "sat".to_owned(), 13),
            (15, "fat".to_owned(), 18)
        ]
    );
    assert_eq!(cursor.last_index, 0);
}

#[test]
fn test_test_with_global() {
    assert!(Regex::new(r"\d{3}-\d{2}-\d{4}")
        .unwrap()
        .test("000-00-0000", &mut Cursor::new())
        .unwrap());

    let text = "bad dad eazy go mad.";
    let re = Regex::with_flags(".ad", "g").unwrap();
    let mut cursor = Cursor::new();
    let results: Vec<bool> = (0..5).map(|_| re.test(text, &mut cursor).unwrap()).collect();
    assert_eq!(results, vec![true, true, true, false, true]);
}

#[test]
fn test_match_context() {
    let text = "this is a wonderful year!";
    let re = Regex::with_flags("(...)der(...)", "gi").unwrap();
    let caps = re.exec(text, &mut Cursor::new()).unwrap().unwrap();

    let mut context = String::new();
    caps.expand("[$`|$&|$'|$1|$2]", &mut context);
    assert_eq!(context, "[this is a |wonderful| year!|won|ful]");
}

#[test]
fn test_string_match() {
    let text = "cat, bat, sat, fat";

    let re = Regex::new("(.)at").unwrap();
    let caps = re.captures(text).unwrap().unwrap();
    assert_eq!(caps.start(), 0);
    assert_eq!(&caps[0], "cat");
    assert_eq!(&caps[1], "c");

    let re = Regex::with_flags("(.)at", "g").unwrap();
    let all: Vec<&str> = re
        .find_iter(text)
        .map(|m| m.unwrap().as_str())
        .collect();
    assert_eq!(all, vec!["cat", "bat", "sat", "fat"]);

    let re = Regex::new("at").unwrap();
    assert_eq!(re.find(text).unwrap().map(|m| m.start()), Some(1));
}

#[test]
fn test_string_replace() {
    let text = "cat, bat, sat, fat";

    assert_eq!(
        Regex::new("at").unwrap().replace(text, "ond").unwrap(),
        "cond, bat, sat, fat"
    );
    assert_eq!(
        Regex::with_flags("at", "g").unwrap().replace(text, "ond").unwrap(),
        "cond, bond, sond, fond"
    );
    assert_eq!(
        Regex::with_flags("(.a)(t)", "g")
            .unwrap()
            .replace(text, "word ($1$2)")
            .unwrap(),
        "word (cat), word (bat), word (sat), word (fat)"
    );
    assert_eq!(
        Regex::with_flags("at", "g")
            .unwrap()
            .replace(text, NoExpand("$&"))
            .unwrap(),
        "c$&, b$&, s$&, f$&"
    );
}

fn html_escape(text: &str) -> String {
    let re = Regex::with_flags(r#"[<>"&]"#, "g").unwrap();
    re.replace(text, |caps: &Captures| match &caps[0] {
        "<" => "&lt;",
        ">" => "&gt;",
        "&" => "&amp;",
        _ => "&quot;",
    })
    .unwrap()
    .into_owned()
}

#[test]
fn test_replace_with_callback() {
    assert_eq!(
        html_escape(r#"<p class="greeting"> Hello world! </p>"#),
        "&lt;p class=&quot;greeting&quot;&gt; Hello world! &lt;/p&gt;"
    );

    // the callback sees the groups and the offset of each match
    let re = Regex::with_flags(r"(\d)(x)?", "g").unwrap();
    let result = re
        .replace("a1b2x", |caps: &Captures| {
            let suffix = caps.get(2).map_or("-", |m| m.as_str());
            format!("<{}{}@{}>", &caps[1], suffix, caps.start())
        })
        .unwrap();
    assert_eq!(result, "a<1-@1>b<2x@3>");
}

#[test]
fn test_split() {
    let re = Regex::with_flags(".a", "i").unwrap();
    assert_eq!(
        re.split("my name is NAT", None).unwrap(),
        vec![Some("my "), Some("me is "), Some("T")]
    );

    let re = Regex::new(r"(\d)").unwrap();
    assert_eq!(
        re.split("a1b2c", Some(4)).unwrap(),
        vec![Some("a"), Some("1"), Some("b"), Some("2")]
    );
}

#[test]
fn test_astral_chars() {
    // chars outside the BMP are a single char
    let text = "𠮷";
    assert!(Regex::new("^.$").unwrap().is_match(text).unwrap());

    let re = Regex::with_flags("^.$", "u").unwrap();
    assert!(re.is_match(text).unwrap());
    assert_eq!(re.flags().to_string(), "u");

    // a surrogate pair escape is the astral char
    let re = Regex::new(r"^\uD842\uDFB7$").unwrap();
    assert!(re.is_match(text).unwrap());
}

#[test]
fn test_sticky() {
    let text = "hello hexo.";

    let re = Regex::with_flags("h", "g").unwrap();
    assert!(!re.flags().sticky);
    let mut cursor = Cursor::new();
    assert!(re.test(text, &mut cursor).unwrap());
    let mut cursor = Cursor::at(2);
    assert!(re.test(text, &mut cursor).unwrap());
    assert_eq!(cursor.last_index, 7);

    let re = Regex::with_flags("h", "gy").unwrap();
    assert!(re.flags().sticky);
    let mut cursor = Cursor::new();
    assert!(re.test(text, &mut cursor).unwrap());
    let mut cursor = Cursor::at(2);
    assert!(!re.test(text, &mut cursor).unwrap());
    assert_eq!(cursor.last_index, 0);

    // `^` with a sticky search never matches past offset 0
    let re = Regex::with_flags("^h", "y").unwrap();
    assert!(!re.test(text, &mut Cursor::at(6)).unwrap());
}

#[test]
fn test_recompile_with_flags() {
    let re = Regex::with_flags("hello", "i").unwrap();
    assert_eq!(re.to_string(), "/hello/i");
    assert!(re.test("Hello world", &mut Cursor::new()).unwrap());

    let re = Regex::with_flags(re.as_str(), "gmu").unwrap();
    assert_eq!(re.to_string(), "/hello/gmu");
    assert!(!re.test("Hello world", &mut Cursor::new()).unwrap());
}

#[test]
fn test_flag_errors() {
    assert!(Regex::with_flags(".", "u").is_ok());
    assert!(matches!(
        Regex::with_flags(".", "uu"),
        Err(RegexError::InvalidFlags(_))
    ));
    assert!(matches!(
        Regex::with_flags(".", "x"),
        Err(RegexError::InvalidFlags(_))
    ));
}
