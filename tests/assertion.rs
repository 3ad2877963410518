// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use pretty_assertions::assert_eq;
use regex_backtrack::{Cursor, Regex};

fn is_match(pattern: &str, text: &str) -> bool {
    Regex::new(pattern).unwrap().is_match(text).unwrap()
}

fn exec_all(pattern: &str, flags: &str, text: &str) -> Vec<String> {
    let re = Regex::with_flags(pattern, flags).unwrap();
    let mut cursor = Cursor::new();
    let mut values = vec![];
    while let Some(caps) = re.exec(text, &mut cursor).unwrap() {
        values.push(caps[0].to_owned());
    }
    values
}

fn replace_all(pattern: &str, flags: &str, text: &str, template: &str) -> String {
    let re = Regex::with_flags(pattern, flags).unwrap();
    re.replace(text, template).unwrap().into_owned()
}

#[test]
fn test_word_boundary() {
    assert_eq!(exec_all(r"\b\w+\b", "g", "Hello world!"), vec!["Hello", "world"]);

    assert!(is_match(r"\bcat\b", "a cat."));
    assert!(!is_match(r"\bcat\b", "concat"));
    assert!(is_match(r"\Bcat", "concat"));

    // non-ASCII letters are not word chars
    assert!(is_match(r"\bcat\b", "文cat文"));
}

#[test]
fn test_line_start() {
    let text = "first line\nsecond line\r\n\rlast line";
    assert_eq!(exec_all(r"^\w+", "mg", text), vec!["first", "second", "last"]);
    assert_eq!(exec_all(r"^\w+", "g", text), vec!["first"]);
}

#[test]
fn test_line_end() {
    assert!(is_match(r"\w+$", "Some sample text"));

    // without the multiline flag `$` only matches at the very end
    assert!(!is_match(r"\w+$", "Some sample text\n"));

    let text = "first line\nsecond line\r\n\rlast line";
    assert_eq!(exec_all(r"\w+$", "mg", text), vec!["line", "line", "line"]);

    let text = "first line\nsecond line\r\n\rlast line\n";
    assert_eq!(exec_all(r"\w+$", "mg", text), vec!["line", "line", "line"]);
}

#[test]
fn test_replace_at_anchors() {
    let text = "line1\nline2\nline3";
    let with_end = replace_all("$", "mg", text, "</p>");
    assert_eq!(
        replace_all("^", "mg", &with_end, "<p>"),
        "<p>line1</p>\n<p>line2</p>\n<p>line3</p>"
    );

    let with_space = "    begin\n between\t\n\nend";
    let trimmed_start = replace_all(r"^\s+", "gm", with_space, "");
    assert_eq!(replace_all(r"\s+$", "gm", &trimmed_start, ""), "begin\nbetween\nend");

    assert_eq!(
        replace_all(r"(^\s+|\s+$)", "mg", with_space, ""),
        "begin\nbetweenend"
    );
}

#[test]
fn test_open_tag_with_look_around() {
    let pattern = r#"^<(?!/)('[^']*'|"[^"]*"|[^'">])+(?<!/)>$"#;
    assert!(is_match(pattern, r#"<input name=txt value=">">"#));
    assert!(is_match(pattern, "<input name=txt value='>'>"));
    assert!(is_match(pattern, "<u>"));
    assert!(!is_match(pattern, "<br/>"));
    assert!(!is_match(pattern, r#"<img src="url" />"#));
}

#[test]
fn test_thousands_separator() {
    let text = "123456789";
    assert_eq!(replace_all(r"(?=(\d{3})+)", "g", text, ","), ",1,2,3,4,5,6,789");
    assert_eq!(replace_all(r"(?=(\d{3})+(?!\d))", "g", text, ","), ",123,456,789");
    assert_eq!(
        replace_all(r"(?<=\d)(?=(\d{3})+(?!\d))", "g", text, ","),
        "123,456,789"
    );
}

#[test]
fn test_remove_unnecessary_space() {
    let text = "中英文混排，some    English word,有多余的空 白字符";
    assert_eq!(
        replace_all(r"(?<![a-zA-Z])\s+(?![a-zA-Z])", "g", text, ""),
        "中英文混排，some  English word,有多余的空白字符"
    );

    let text = "  中英文混排，some    English word,有多余的空 白字符  ";
    assert_eq!(
        replace_all(r"(?<![a-zA-Z])\s+(?![a-zA-Z])", "g", text, ""),
        "中英文混排，some  English word,有多余的空白字符"
    );
    assert_eq!(
        replace_all(r"(?<=[^a-zA-Z])\s+(?=[^a-zA-Z])", "g", text, ""),
        " 中英文混排，some  English word,有多余的空白字符 "
    );
}

#[test]
fn test_host_name() {
    let pattern = r"^(?=[-a-zA-Z\d.]{0,255}(?![-a-zA-Z\d.]))((?!-)[-a-zA-Z\d]{1,63}\.)*(?!-)[-a-zA-Z\d]{1,63}$";
    let re = Regex::with_flags(pattern, "g").unwrap();
    let test = |text: &str| re.test(text, &mut Cursor::new()).unwrap();

    assert!(test("localhost"));
    assert!(test("example.com"));
    assert!(!test("-example.com"));
    assert!(!test(&format!("{}.com", "e".repeat(64))));
    assert!(!test(&"e".repeat(256)));
}

#[test]
fn test_consonant() {
    assert!(is_match("[b-df-hj-np-tv-z]", "bcd"));
    assert!(is_match("(?![aeiou])[a-z]", "bcd"));
    assert!(!is_match("^(?![aeiou])[a-z]$", "e"));
}

#[test]
fn test_look_around_with_group() {
    let re = Regex::new("(?!ab)(cd)").unwrap();
    let caps = re.captures("abcd").unwrap().unwrap();
    assert_eq!(&caps[0], "cd");
    assert_eq!(&caps[1], "cd");

    // look-ahead is zero-width, but its groups keep their values
    let re = Regex::new("^(?=(ab|cd))").unwrap();
    let caps = re.captures("abcd").unwrap().unwrap();
    assert_eq!(&caps[0], "");
    assert_eq!(&caps[1], "ab");

    let re = Regex::new("^(?=(?:ab|cd))").unwrap();
    let caps = re.captures("abcd").unwrap().unwrap();
    assert_eq!(caps.len(), 1);

    // groups in a negative look-around are always unset
    let re = Regex::new("(?!(x))a").unwrap();
    let caps = re.captures("a").unwrap().unwrap();
    assert!(caps.get(1).is_none());
}

#[test]
fn test_look_behind() {
    assert_eq!(
        exec_all(r"(?<=\$)\d+", "g", "cost: $30, tax: 5, total: $35"),
        vec!["30", "35"]
    );
    assert_eq!(
        exec_all(r"(?<!\$)\b\d+", "g", "cost: $30, tax: 5, total: $35"),
        vec!["5"]
    );

    // variable length look-behind
    assert!(is_match(r"(?<=ab+)c", "abbbc"));
    assert!(!is_match(r"(?<=ab+)c", "ac"));

    // a look-behind sees the text before the search start
    let re = Regex::new(r"(?<=a)b").unwrap();
    assert_eq!(re.find_at("ab", 1).unwrap().map(|m| m.start()), Some(1));

    // a look-behind body is matched left to right, a back-reference
    // inside it refers to the group on its left
    assert!(is_match(r"(?<=(\d)\1)x", "11x"));
    assert!(!is_match(r"(?<=(\d)\1)x", "12x"));
}

#[test]
fn test_multiple_look_arounds() {
    // at least one digit, one lower case letter, 6 or more chars
    let re = Regex::new(r"^(?=.*\d)(?=.*[a-z]).{6,}$").unwrap();
    assert!(re.is_match("abc123").unwrap());
    assert!(!re.is_match("abcdef").unwrap());
    assert!(!re.is_match("123456").unwrap());
    assert!(!re.is_match("ab1").unwrap());
}
