// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{
    borrow::Cow,
    fmt::{self, Display},
    ops::{Index, Range},
};

use log::debug;

use crate::{
    ast::{find_capture_group, Program},
    flags::Flags,
    matcher::{attempt_match, search, Limits, Span},
    printer::is_syntax_char,
    replacer::{self, Replacer},
    syntax::parse_from_str,
    RegexError,
};

/// A compiled pattern.
///
/// A `Regex` never changes after it is built, iteration state lives in
/// a caller-owned [`Cursor`], so one `Regex` can be shared by threads.
#[derive(Debug, Clone)]
pub struct Regex {
    source: String,
    flags: Flags,
    program: Program,
    limits: Limits,
}

/// Build a `Regex` with flags and match limits.
///
/// ```
/// use regex_backtrack::RegexBuilder;
///
/// let re = RegexBuilder::new("a+")
///     .flags("gi")
///     .step_limit(Some(1000))
///     .build()
///     .unwrap();
/// assert!(re.is_match("xAx").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct RegexBuilder {
    pattern: String,
    flags: String,
    limits: Limits,
}

impl RegexBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_owned(),
            flags: String::new(),
            limits: Limits::default(),
        }
    }

    /// The flag letters, any of "gimsuy", each at most once.
    pub fn flags(&mut self, flags: &str) -> &mut Self {
        self.flags = flags.to_owned();
        self
    }

    /// The number of node evaluations one search may take,
    /// `None` for unlimited.
    pub fn step_limit(&mut self, limit: Option<usize>) -> &mut Self {
        self.limits.step_limit = limit;
        self
    }

    /// The number of pending backtrack points one search may keep,
    /// `None` for unlimited.
    pub fn depth_limit(&mut self, limit: Option<usize>) -> &mut Self {
        self.limits.depth_limit = limit;
        self
    }

    pub fn build(&self) -> Result<Regex, RegexError> {
        let flags: Flags = self.flags.parse()?;
        let program = parse_from_str(&self.pattern, &flags)?;

        debug!(
            "compiled /{}/{} with {} capture groups",
            self.pattern,
            flags,
            program.number_of_capture_groups() - 1
        );

        Ok(Regex {
            source: self.pattern.clone(),
            flags,
            program,
            limits: self.limits,
        })
    }
}

/// The iteration state of `exec` and `test`, owned by the caller.
///
/// Only patterns with the `g` or `y` flag read and update the cursor.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Cursor {
    pub last_index: usize,

    // the offset where the previous (empty) match ended, the next
    // search starts one char after it.
    empty_match_at: Option<usize>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(last_index: usize) -> Self {
        Self {
            last_index,
            empty_match_at: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, RegexError> {
        RegexBuilder::new(pattern).build()
    }

    pub fn with_flags(pattern: &str, flags: &str) -> Result<Self, RegexError> {
        RegexBuilder::new(pattern).flags(flags).build()
    }

    /// The pattern text this `Regex` was built from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// The size of the capture table, including the whole match.
    pub fn captures_len(&self) -> usize {
        self.program.number_of_capture_groups()
    }

    /// The group names by index, `None` for the whole match and
    /// the unnamed groups.
    pub fn capture_names(&self) -> impl Iterator<Item = Option<&str>> {
        self.program.capture_groups.iter().map(|name| name.as_deref())
    }

    pub fn is_match(&self, text: &str) -> Result<bool, RegexError> {
        Ok(self.search_at(text, 0)?.is_some())
    }

    pub fn find<'r, 't>(&'r self, text: &'t str) -> Result<Option<Match<'r, 't>>, RegexError> {
        self.find_at(text, 0)
    }

    /// Search from the byte offset `start`. Anchors and look-behind
    /// still see the text before `start`.
    pub fn find_at<'r, 't>(
        &'r self,
        text: &'t str,
        start: usize,
    ) -> Result<Option<Match<'r, 't>>, RegexError> {
        let spans = self.search_at(text, start)?;
        Ok(spans.map(|spans| {
            let (start, end) = spans[0].unwrap_or_default();
            Match::new(start, end, None, &text[start..end])
        }))
    }

    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches {
            searcher: Searcher::new(self, text),
        }
    }

    pub fn captures<'r, 't>(
        &'r self,
        text: &'t str,
    ) -> Result<Option<Captures<'r, 't>>, RegexError> {
        self.captures_at(text, 0)
    }

    pub fn captures_at<'r, 't>(
        &'r self,
        text: &'t str,
        start: usize,
    ) -> Result<Option<Captures<'r, 't>>, RegexError> {
        let spans = self.search_at(text, start)?;
        Ok(spans.map(|spans| Captures::new(&self.program, text, &spans)))
    }

    pub fn captures_iter<'r, 't>(&'r self, text: &'t str) -> CaptureMatches<'r, 't> {
        CaptureMatches {
            searcher: Searcher::new(self, text),
        }
    }

    /// Run one search, reading and updating `cursor` when the pattern
    /// has the `g` or `y` flag.
    ///
    /// ```
    /// use regex_backtrack::{Cursor, Regex};
    ///
    /// let re = Regex::with_flags("o", "g").unwrap();
    /// let mut cursor = Cursor::new();
    ///
    /// let first = re.exec("foo", &mut cursor).unwrap().unwrap();
    /// assert_eq!(first.start(), 1);
    /// assert_eq!(cursor.last_index, 2);
    ///
    /// let second = re.exec("foo", &mut cursor).unwrap().unwrap();
    /// assert_eq!(second.start(), 2);
    ///
    /// assert!(re.exec("foo", &mut cursor).unwrap().is_none());
    /// assert_eq!(cursor.last_index, 0);
    /// ```
    pub fn exec<'r, 't>(
        &'r self,
        text: &'t str,
        cursor: &mut Cursor,
    ) -> Result<Option<Captures<'r, 't>>, RegexError> {
        if !self.flags.is_stateful() {
            return self.captures_at(text, 0);
        }

        let mut start = cursor.last_index;
        if cursor.empty_match_at == Some(start) {
            start = next_char_offset(text, start);
        }

        if start > text.len() {
            cursor.reset();
            return Ok(None);
        }

        match self.search_at(text, start)? {
            Some(spans) => {
                let (match_start, match_end) = spans[0].unwrap_or_default();
                cursor.last_index = match_end;
                cursor.empty_match_at = (match_start == match_end).then_some(match_end);
                Ok(Some(Captures::new(&self.program, text, &spans)))
            }
            None => {
                cursor.reset();
                Ok(None)
            }
        }
    }

    pub fn test(&self, text: &str, cursor: &mut Cursor) -> Result<bool, RegexError> {
        Ok(self.exec(text, cursor)?.is_some())
    }

    /// Replace every match when the pattern has the `g` flag,
    /// otherwise the first match only.
    pub fn replace<'t, R: Replacer>(
        &self,
        text: &'t str,
        rep: R,
    ) -> Result<Cow<'t, str>, RegexError> {
        let limit = if self.flags.global { 0 } else { 1 };
        self.replacen(text, limit, rep)
    }

    pub fn replace_all<'t, R: Replacer>(
        &self,
        text: &'t str,
        rep: R,
    ) -> Result<Cow<'t, str>, RegexError> {
        self.replacen(text, 0, rep)
    }

    /// Replace at most `limit` matches, `0` for all.
    pub fn replacen<'t, R: Replacer>(
        &self,
        text: &'t str,
        limit: usize,
        mut rep: R,
    ) -> Result<Cow<'t, str>, RegexError> {
        let mut result = String::with_capacity(text.len());
        let mut last_end = 0;
        let mut count = 0;
        let fixed = rep.no_expansion().map(Cow::into_owned);

        for caps in self.captures_iter(text) {
            let caps = caps?;
            let whole = caps.get_match();

            result.push_str(&text[last_end..whole.start()]);
            match &fixed {
                Some(fixed) => result.push_str(fixed),
                None => rep.replace_append(&caps, &mut result),
            }
            last_end = whole.end();

            count += 1;
            if count == limit {
                break;
            }
        }

        if count == 0 {
            return Ok(Cow::Borrowed(text));
        }

        result.push_str(&text[last_end..]);
        Ok(Cow::Owned(result))
    }

    /// Split `text` around the matches, the values of the capture groups
    /// are inserted after each piece (`None` for an unset group).
    /// The `g` and `y` flags are ignored.
    ///
    /// ```
    /// use regex_backtrack::Regex;
    ///
    /// let re = Regex::new(r"\s*(,)\s*").unwrap();
    /// assert_eq!(
    ///     re.split("a , b", None).unwrap(),
    ///     vec![Some("a"), Some(","), Some("b")]
    /// );
    /// ```
    pub fn split<'t>(
        &self,
        text: &'t str,
        limit: Option<usize>,
    ) -> Result<Vec<Option<&'t str>>, RegexError> {
        let limit = limit.unwrap_or(usize::MAX);
        let mut pieces = vec![];

        if limit == 0 {
            return Ok(pieces);
        }

        if text.is_empty() {
            if self.attempt_at(text, 0)?.is_none() {
                pieces.push(Some(text));
            }
            return Ok(pieces);
        }

        let mut piece_start = 0;
        let mut position = 0;

        while position < text.len() {
            let Some(spans) = self.attempt_at(text, position)? else {
                position = next_char_offset(text, position);
                continue;
            };

            let (_, match_end) = spans[0].unwrap_or_default();
            if match_end == piece_start {
                position = next_char_offset(text, position);
                continue;
            }

            pieces.push(Some(&text[piece_start..position]));
            if pieces.len() == limit {
                return Ok(pieces);
            }

            for span in &spans[1..] {
                pieces.push(span.map(|(start, end)| &text[start..end]));
                if pieces.len() == limit {
                    return Ok(pieces);
                }
            }

            piece_start = match_end;
            position = match_end;
        }

        pieces.push(Some(&text[piece_start..]));
        Ok(pieces)
    }

    fn search_at(&self, text: &str, start: usize) -> Result<Option<Vec<Option<Span>>>, RegexError> {
        search(&self.program, text, start, &self.flags, &self.limits)
    }

    fn attempt_at(
        &self,
        text: &str,
        start: usize,
    ) -> Result<Option<Vec<Option<Span>>>, RegexError> {
        attempt_match(&self.program, text, start, &self.flags, &self.limits)
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = if self.source.is_empty() {
            "(?:)"
        } else {
            &self.source
        };
        write!(f, "/{}/{}", source, self.flags)
    }
}

/// Escape the syntax chars of `text`, the result is a pattern
/// that matches `text` literally.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if is_syntax_char(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// The offset of the char after `position`, one past the end when
// `position` is at the end.
fn next_char_offset(text: &str, position: usize) -> usize {
    (position + 1..=text.len())
        .find(|offset| text.is_char_boundary(*offset))
        .unwrap_or(position + 1)
}

// Shared by the two iterators: searches from the end of the
// previous match, skipping one char after an empty match.
struct Searcher<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    last_position: usize,
    finished: bool,
}

impl<'r, 't> Searcher<'r, 't> {
    fn new(regex: &'r Regex, text: &'t str) -> Self {
        Self {
            regex,
            text,
            last_position: 0,
            finished: false,
        }
    }

    fn next_spans(&mut self) -> Option<Result<Vec<Option<Span>>, RegexError>> {
        if self.finished || self.last_position > self.text.len() {
            return None;
        }

        match self.regex.search_at(self.text, self.last_position) {
            Ok(Some(spans)) => {
                let (start, end) = spans[0].unwrap_or_default();
                self.last_position = if start == end {
                    next_char_offset(self.text, end)
                } else {
                    end
                };
                Some(Ok(spans))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Iterates over the matches of a text, see [`Regex::find_iter`].
pub struct Matches<'r, 't> {
    searcher: Searcher<'r, 't>,
}

impl<'r, 't> Iterator for Matches<'r, 't> {
    type Item = Result<Match<'r, 't>, RegexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.searcher.text;
        let spans = self.searcher.next_spans()?;
        Some(spans.map(|spans| {
            let (start, end) = spans[0].unwrap_or_default();
            Match::new(start, end, None, &text[start..end])
        }))
    }
}

/// Iterates over the captures of each match, see [`Regex::captures_iter`].
pub struct CaptureMatches<'r, 't> {
    searcher: Searcher<'r, 't>,
}

impl<'r, 't> Iterator for CaptureMatches<'r, 't> {
    type Item = Result<Captures<'r, 't>, RegexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let regex: &'r Regex = self.searcher.regex;
        let text = self.searcher.text;
        let spans = self.searcher.next_spans()?;
        Some(spans.map(|spans| Captures::new(&regex.program, text, &spans)))
    }
}

/// The result of a successful match: the whole match and
/// the value of every capture group.
#[derive(Debug, PartialEq, Clone)]
pub struct Captures<'r, 't> {
    text: &'t str,
    whole: Match<'r, 't>,

    // groups 1.., `None` for the groups that did not take part in the match.
    groups: Vec<Option<Match<'r, 't>>>,

    names: &'r [Option<String>],
}

impl<'r, 't> Captures<'r, 't> {
    fn new(program: &'r Program, text: &'t str, spans: &[Option<Span>]) -> Self {
        let names = program.capture_groups.as_slice();

        let to_match = |index: usize, (start, end): Span| {
            Match::new(
                start,
                end,
                program.get_capture_group_name_by_index(index),
                &text[start..end],
            )
        };

        let whole = to_match(0, spans.first().copied().flatten().unwrap_or_default());
        let groups = spans
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, span)| span.map(|span| to_match(index, span)))
            .collect();

        Captures {
            text,
            whole,
            groups,
            names,
        }
    }

    // the following methods are intended to
    // be compatible with the 'Captures' API of crate 'regex':
    // https://docs.rs/regex/latest/regex/struct.Captures.html

    /// Group 0 is the whole match.
    pub fn get(&self, index: usize) -> Option<&Match<'r, 't>> {
        if index == 0 {
            Some(&self.whole)
        } else {
            self.groups.get(index - 1).and_then(Option::as_ref)
        }
    }

    /// The whole match.
    pub fn get_match(&self) -> &Match<'r, 't> {
        &self.whole
    }

    pub fn name(&self, name: &str) -> Option<&Match<'r, 't>> {
        let index = find_capture_group(self.names, name)?;
        self.get(index)
    }

    pub fn has_named_groups(&self) -> bool {
        self.names.iter().any(Option::is_some)
    }

    /// The text that was searched.
    pub fn input(&self) -> &'t str {
        self.text
    }

    /// The byte offset where the match starts.
    pub fn start(&self) -> usize {
        self.whole.start
    }

    /// All groups by index, starting with the whole match.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Match<'r, 't>>> {
        std::iter::once(Some(&self.whole)).chain(self.groups.iter().map(Option::as_ref))
    }

    /// The named groups, in the order of their opening parentheses.
    pub fn iter_named(&self) -> impl Iterator<Item = (&'r str, Option<&Match<'r, 't>>)> {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| name.as_deref().map(|name| (name, self.get(index))))
    }

    // e.g.
    //
    // ```
    //   let c = re.captures("...").unwrap().unwrap();
    //   let (whole, [one, two, three]) = c.extract();
    // ```
    //
    // Unset groups give empty strings.
    pub fn extract<const N: usize>(&self) -> (&'t str, [&'t str; N]) {
        let mut items: [&str; N] = [""; N];
        for (index, item) in items.iter_mut().enumerate() {
            *item = self.get(index + 1).map_or("", |m| m.value);
        }
        (self.whole.value, items)
    }

    /// Expand a replacement template, see [`replacer::expand`].
    pub fn expand(&self, template: &str, dst: &mut String) {
        replacer::expand(self, template, dst);
    }

    /// The size of the capture table, the whole match included.
    pub fn len(&self) -> usize {
        self.groups.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Index<usize> for Captures<'_, '_> {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|| panic!(
                "Index {} is out of range of the capture group or the group is unset, the length of capture groups is {}.",
                index, self.len()))
            .as_str()
    }
}

impl Index<&str> for Captures<'_, '_> {
    type Output = str;

    fn index(&self, name: &str) -> &Self::Output {
        self.name(name)
            .unwrap_or_else(|| panic!("Cannot find the capture group named \"{}\".", name))
            .as_str()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Match<'r, 't> {
    pub start: usize, // byte offset into the text (included)
    pub end: usize,   // byte offset into the text (excluded)
    pub name: Option<&'r str>,
    pub value: &'t str,
}

impl<'r, 't> Match<'r, 't> {
    pub fn new(start: usize, end: usize, name: Option<&'r str>, value: &'t str) -> Self {
        Match {
            start,
            end,
            name,
            value,
        }
    }

    // the following methods are intended to
    // be compatible with the 'Match' API of crate 'regex':
    // https://docs.rs/regex/latest/regex/struct.Match.html

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        Range {
            start: self.start,
            end: self.end,
        }
    }

    pub fn as_str(&self) -> &'t str {
        self.value
    }
}
