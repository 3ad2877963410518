// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// The matcher walks the AST with continuation passing, but neither
// the continuations nor the pending choices live on the native stack:
// `conts` is an arena of continuation nodes linked by index, and
// `choices` is the backtrack stack. Every capture write is logged in
// `trail`, so popping a choice undoes the writes made after it.
//
// A look-around runs as a nested `run` on the same stacks. The choices
// it leaves behind are dropped when it succeeds, which makes it atomic.
// Native recursion is therefore bounded by the look-around nesting of
// the pattern, not by the length of the subject.

use log::{debug, trace};

use crate::{
    ast::{
        AnchorKind, BackReference, CaptureSpec, Direction, Group, LookAssertion, Node, Program,
        Quantifier,
    },
    charset::{chars_equal, is_line_terminator, is_word_char},
    flags::Flags,
    RegexError,
};

pub const DEFAULT_STEP_LIMIT: usize = 10_000_000;
pub const DEFAULT_DEPTH_LIMIT: usize = 1_000_000;

/// A `(start, end)` pair of byte offsets into the subject.
pub type Span = (usize, usize);

/// Bounds of a single search, `None` means unlimited.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Limits {
    // the number of node evaluations per search
    pub step_limit: Option<usize>,

    // the number of pending backtrack points, it bounds
    // the memory a search can take.
    pub depth_limit: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            step_limit: Some(DEFAULT_STEP_LIMIT),
            depth_limit: Some(DEFAULT_DEPTH_LIMIT),
        }
    }
}

/// Match `program` exactly at `start`, returns the capture table
/// with slot 0 holding the whole match.
pub fn attempt_match(
    program: &Program,
    text: &str,
    start: usize,
    flags: &Flags,
    limits: &Limits,
) -> Result<Option<Vec<Option<Span>>>, RegexError> {
    if start > text.len() || !text.is_char_boundary(start) {
        return Ok(None);
    }

    let mut context = Context::new(program, text, flags, limits);
    context.match_at(&program.root, start)
}

/// Search forward from `start`. With the sticky flag only `start` itself
/// is tried. A `start` inside a multi-byte char is moved to the next char.
pub fn search(
    program: &Program,
    text: &str,
    start: usize,
    flags: &Flags,
    limits: &Limits,
) -> Result<Option<Vec<Option<Span>>>, RegexError> {
    if start > text.len() {
        return Ok(None);
    }

    let mut position = start;
    while !text.is_char_boundary(position) {
        position += 1;
    }

    let fixed_start = program.is_fixed_start();
    let mut context = Context::new(program, text, flags, limits);

    loop {
        if fixed_start && position > 0 {
            return Ok(None);
        }

        trace!("search at offset {}", position);

        if let Some(captures) = context.match_at(&program.root, position)? {
            return Ok(Some(captures));
        }

        if flags.sticky {
            return Ok(None);
        }

        match context.char_at(position) {
            Some(c) => position += c.len_utf8(),
            None => return Ok(None),
        }
    }
}

// An index into `Context::conts`.
type ContId = usize;

// Slot 0 of the arena, the end of a pattern or of a look-ahead body.
const ACCEPT: ContId = 0;

// The rest of the pattern, a linked list inside the arena.
#[derive(Debug, Clone, Copy)]
enum Continuation<'a> {
    Accept,

    // the look-behind body has to end at this offset
    AssertEnd(usize),

    Sequence {
        rest: &'a [Node],
        next: ContId,
    },
    CaptureEnd {
        index: usize,
        start: usize,
        next: ContId,
    },
    Repetition {
        quantifier: &'a Quantifier,
        count: usize, // the iterations completed, including the current one
        start: usize, // the offset where the current iteration began
        next: ContId,
    },
}

#[derive(Debug, Clone, Copy)]
enum Step<'a> {
    Node(&'a Node, ContId),
    Resume(ContId),

    // choose between one more iteration and the rest of the pattern
    Repeat {
        quantifier: &'a Quantifier,
        count: usize,
        next: ContId,
    },

    // begin iteration `count + 1`
    Iterate {
        quantifier: &'a Quantifier,
        count: usize,
        next: ContId,
    },
}

#[derive(Debug, Clone, Copy)]
enum Alternative<'a> {
    Step(Step<'a>),

    // a greedy single-char repetition gives back one char,
    // it never goes below `min_end`.
    GiveBack { min_end: usize, next: ContId },

    // a lazy single-char repetition takes one more char
    TakeMore {
        quantifier: &'a Quantifier,
        count: usize,
        next: ContId,
    },
}

struct Choice<'a> {
    alternative: Alternative<'a>,
    pos: usize,
    trail: usize, // the trail length when the choice was made
    conts: usize, // the arena length when the choice was made
}

enum Flow<'a> {
    Next(Step<'a>, usize),
    Accept(usize),
    Fail,
}

type MatchResult = Result<Option<usize>, RegexError>;

struct Context<'a> {
    text: &'a str,
    flags: Flags,
    limits: Limits,
    captures: Vec<Option<Span>>,
    trail: Vec<(usize, Option<Span>)>,
    conts: Vec<Continuation<'a>>,
    choices: Vec<Choice<'a>>,
    steps: usize,
}

impl<'a> Context<'a> {
    fn new(program: &'a Program, text: &'a str, flags: &Flags, limits: &Limits) -> Self {
        Self {
            text,
            flags: *flags,
            limits: *limits,
            captures: vec![None; program.number_of_capture_groups()],
            trail: vec![],
            conts: vec![Continuation::Accept],
            choices: vec![],
            steps: 0,
        }
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..)?.chars().next()
    }

    fn char_before(&self, pos: usize) -> Option<char> {
        self.text.get(..pos)?.chars().next_back()
    }

    fn count_step(&mut self) -> Result<(), RegexError> {
        self.steps += 1;

        match self.limits.step_limit {
            Some(limit) if self.steps > limit => {
                debug!("step limit {} reached", limit);
                Err(RegexError::MatchBudgetExceeded(format!(
                    "step limit {} reached.",
                    limit
                )))
            }
            _ => Ok(()),
        }
    }

    fn push_cont(&mut self, continuation: Continuation<'a>) -> ContId {
        self.conts.push(continuation);
        self.conts.len() - 1
    }

    fn push_choice(&mut self, alternative: Alternative<'a>, pos: usize) -> Result<(), RegexError> {
        if let Some(limit) = self.limits.depth_limit {
            if self.choices.len() >= limit {
                debug!("backtrack depth limit {} reached", limit);
                return Err(RegexError::MatchBudgetExceeded(format!(
                    "depth limit {} reached.",
                    limit
                )));
            }
        }

        self.choices.push(Choice {
            alternative,
            pos,
            trail: self.trail.len(),
            conts: self.conts.len(),
        });
        Ok(())
    }

    fn set_capture(&mut self, index: usize, value: Option<Span>) {
        let old = std::mem::replace(&mut self.captures[index], value);
        if old != value {
            self.trail.push((index, old));
        }
    }

    // undo the capture writes back to the trail length `mark`
    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some((index, old)) = self.trail.pop() {
                self.captures[index] = old;
            }
        }
    }

    fn match_at(&mut self, root: &'a Node, start: usize) -> Result<Option<Vec<Option<Span>>>, RegexError> {
        self.captures.iter_mut().for_each(|slot| *slot = None);
        self.trail.clear();
        self.choices.clear();
        self.conts.truncate(ACCEPT + 1);

        match self.run(root, start, ACCEPT)? {
            Some(end) => {
                self.captures[0] = Some((start, end));
                Ok(Some(self.captures.clone()))
            }
            None => Ok(None),
        }
    }

    // Match `node` at `start` followed by the continuation `next`, returns
    // the end offset of the first success. Only the choices made by this
    // run are popped, and all of them are gone when it returns.
    fn run(&mut self, node: &'a Node, start: usize, next: ContId) -> MatchResult {
        let barrier = self.choices.len();
        let trail_base = self.trail.len();
        let conts_base = self.conts.len();

        let mut step = Step::Node(node, next);
        let mut pos = start;

        loop {
            let flow = match step {
                Step::Node(node, next) => self.match_node(node, pos, next)?,
                Step::Resume(next) => self.resume(next, pos),
                Step::Repeat {
                    quantifier,
                    count,
                    next,
                } => self.repeat(quantifier, count, pos, next)?,
                Step::Iterate {
                    quantifier,
                    count,
                    next,
                } => self.iterate(quantifier, count, pos, next),
            };

            match flow {
                Flow::Next(next_step, next_pos) => {
                    step = next_step;
                    pos = next_pos;
                }
                Flow::Accept(end) => {
                    self.choices.truncate(barrier);
                    self.conts.truncate(conts_base);
                    return Ok(Some(end));
                }
                Flow::Fail => match self.backtrack(barrier)? {
                    Some((next_step, next_pos)) => {
                        step = next_step;
                        pos = next_pos;
                    }
                    None => {
                        self.undo(trail_base);
                        self.conts.truncate(conts_base);
                        return Ok(None);
                    }
                },
            }
        }
    }

    // Pop the most recent choice above `barrier` and return where to go on.
    fn backtrack(&mut self, barrier: usize) -> Result<Option<(Step<'a>, usize)>, RegexError> {
        while self.choices.len() > barrier {
            let Some(choice) = self.choices.pop() else {
                break;
            };

            self.undo(choice.trail);
            self.conts.truncate(choice.conts);

            match choice.alternative {
                Alternative::Step(step) => return Ok(Some((step, choice.pos))),
                Alternative::GiveBack { min_end, next } => {
                    let Some(c) = self.char_before(choice.pos) else {
                        continue;
                    };

                    let end = choice.pos - c.len_utf8();
                    if end > min_end {
                        self.push_choice(Alternative::GiveBack { min_end, next }, end)?;
                    }
                    return Ok(Some((Step::Resume(next), end)));
                }
                Alternative::TakeMore {
                    quantifier,
                    count,
                    next,
                } => {
                    let Some(end) = self.match_single_char(&quantifier.body, choice.pos) else {
                        continue;
                    };

                    self.count_step()?;
                    if quantifier.max.map_or(true, |max| count + 1 < max) {
                        self.push_choice(
                            Alternative::TakeMore {
                                quantifier,
                                count: count + 1,
                                next,
                            },
                            end,
                        )?;
                    }
                    return Ok(Some((Step::Resume(next), end)));
                }
            }
        }

        Ok(None)
    }

    fn match_node(&mut self, node: &'a Node, pos: usize, next: ContId) -> Result<Flow<'a>, RegexError> {
        self.count_step()?;

        let flow = match node {
            Node::Literal(_) | Node::AnyChar | Node::CharClass(_) => {
                match self.match_single_char(node, pos) {
                    Some(end) => Flow::Next(Step::Resume(next), end),
                    None => Flow::Fail,
                }
            }
            Node::Anchor(kind) => {
                if self.check_anchor(*kind, pos) {
                    Flow::Next(Step::Resume(next), pos)
                } else {
                    Flow::Fail
                }
            }
            Node::Sequence(parts) => self.match_sequence(parts, pos, next),
            Node::Alternation(branches) => self.match_alternation(branches, pos, next)?,
            Node::Group(group) => self.match_group(group, pos, next),
            Node::Quantifier(quantifier) => {
                if quantifier.body.is_single_char() {
                    self.repeat_single_char(quantifier, pos, next)?
                } else {
                    Flow::Next(
                        Step::Repeat {
                            quantifier,
                            count: 0,
                            next,
                        },
                        pos,
                    )
                }
            }
            Node::BackReference(back_reference) => {
                self.match_back_reference(back_reference, pos, next)
            }
            Node::LookAssertion(look) => self.match_look_assertion(look, pos, next)?,
        };

        Ok(flow)
    }

    fn resume(&mut self, next: ContId, pos: usize) -> Flow<'a> {
        let continuation = self.conts[next];

        match continuation {
            Continuation::Accept => Flow::Accept(pos),
            Continuation::AssertEnd(end) => {
                if pos == end {
                    Flow::Accept(pos)
                } else {
                    Flow::Fail
                }
            }
            Continuation::Sequence { rest, next } => self.match_sequence(rest, pos, next),
            Continuation::CaptureEnd { index, start, next } => {
                self.set_capture(index, Some((start, pos)));
                Flow::Next(Step::Resume(next), pos)
            }
            Continuation::Repetition {
                quantifier,
                count,
                start,
                next,
            } => {
                // an iteration beyond the minimum must consume something,
                // otherwise `(a*)*` would loop forever.
                if pos == start && count > quantifier.min {
                    return Flow::Fail;
                }

                Flow::Next(
                    Step::Repeat {
                        quantifier,
                        count,
                        next,
                    },
                    pos,
                )
            }
        }
    }

    fn match_single_char(&self, node: &Node, pos: usize) -> Option<usize> {
        let c = self.char_at(pos)?;

        let matched = match node {
            Node::Literal(expected) => chars_equal(*expected, c, self.flags.ignore_case),
            Node::AnyChar => self.flags.dot_all || !is_line_terminator(c),
            Node::CharClass(class) => class.matches(c, self.flags.ignore_case),
            _ => false,
        };

        matched.then_some(pos + c.len_utf8())
    }

    fn check_anchor(&self, kind: AnchorKind, pos: usize) -> bool {
        match kind {
            AnchorKind::StringStart => pos == 0,
            AnchorKind::StringEnd => pos == self.text.len(),
            AnchorKind::LineStart => {
                pos == 0 || self.char_before(pos).is_some_and(is_line_terminator)
            }
            AnchorKind::LineEnd => {
                pos == self.text.len() || self.char_at(pos).is_some_and(is_line_terminator)
            }
            AnchorKind::WordBoundary => self.is_word_boundary(pos),
            AnchorKind::NotWordBoundary => !self.is_word_boundary(pos),
        }
    }

    fn is_word_boundary(&self, pos: usize) -> bool {
        // "no char" at either end counts as a non-word char
        let before = self.char_before(pos).is_some_and(is_word_char);
        let after = self.char_at(pos).is_some_and(is_word_char);
        before != after
    }

    fn match_sequence(&mut self, parts: &'a [Node], pos: usize, next: ContId) -> Flow<'a> {
        match parts.split_first() {
            None => Flow::Next(Step::Resume(next), pos),
            Some((first, [])) => Flow::Next(Step::Node(first, next), pos),
            Some((first, rest)) => {
                let continuation = self.push_cont(Continuation::Sequence { rest, next });
                Flow::Next(Step::Node(first, continuation), pos)
            }
        }
    }

    fn match_alternation(
        &mut self,
        branches: &'a [Node],
        pos: usize,
        next: ContId,
    ) -> Result<Flow<'a>, RegexError> {
        let Some((first, rest)) = branches.split_first() else {
            return Ok(Flow::Fail);
        };

        // the later branches are tried, left to right, on backtracking
        for branch in rest.iter().rev() {
            self.push_choice(Alternative::Step(Step::Node(branch, next)), pos)?;
        }

        Ok(Flow::Next(Step::Node(first, next), pos))
    }

    fn match_group(&mut self, group: &'a Group, pos: usize, next: ContId) -> Flow<'a> {
        match &group.capture {
            CaptureSpec::NonCapturing => Flow::Next(Step::Node(&group.body, next), pos),
            CaptureSpec::Capturing(index) | CaptureSpec::Named(index, _) => {
                let continuation = self.push_cont(Continuation::CaptureEnd {
                    index: *index,
                    start: pos,
                    next,
                });
                Flow::Next(Step::Node(&group.body, continuation), pos)
            }
        }
    }

    fn repeat(
        &mut self,
        quantifier: &'a Quantifier,
        count: usize,
        pos: usize,
        next: ContId,
    ) -> Result<Flow<'a>, RegexError> {
        let can_stop = count >= quantifier.min;
        let can_continue = quantifier.max.map_or(true, |max| count < max);

        let iterate = Step::Iterate {
            quantifier,
            count,
            next,
        };

        if !can_continue {
            return Ok(Flow::Next(Step::Resume(next), pos));
        }

        if !can_stop {
            return Ok(Flow::Next(iterate, pos));
        }

        // greedy: one more iteration first, lazy: the rest first
        if quantifier.lazy {
            self.push_choice(Alternative::Step(iterate), pos)?;
            Ok(Flow::Next(Step::Resume(next), pos))
        } else {
            self.push_choice(Alternative::Step(Step::Resume(next)), pos)?;
            Ok(Flow::Next(iterate, pos))
        }
    }

    fn iterate(
        &mut self,
        quantifier: &'a Quantifier,
        count: usize,
        pos: usize,
        next: ContId,
    ) -> Flow<'a> {
        // every iteration starts with the inner groups unset
        for index in quantifier.inner_groups.clone() {
            self.set_capture(index, None);
        }

        let continuation = self.push_cont(Continuation::Repetition {
            quantifier,
            count: count + 1,
            start: pos,
            next,
        });

        Flow::Next(Step::Node(&quantifier.body, continuation), pos)
    }

    // Repetition of a literal, dot or charset. The order of the
    // attempts is the same as `repeat`, but a single choice stands for
    // all the remaining counts.
    fn repeat_single_char(
        &mut self,
        quantifier: &'a Quantifier,
        pos: usize,
        next: ContId,
    ) -> Result<Flow<'a>, RegexError> {
        let max = quantifier.max.unwrap_or(usize::MAX);

        let mut current = pos;
        for _ in 0..quantifier.min {
            match self.match_single_char(&quantifier.body, current) {
                Some(end) => {
                    self.count_step()?;
                    current = end;
                }
                None => return Ok(Flow::Fail),
            }
        }

        let min_end = current;

        if quantifier.lazy {
            if quantifier.min < max {
                self.push_choice(
                    Alternative::TakeMore {
                        quantifier,
                        count: quantifier.min,
                        next,
                    },
                    min_end,
                )?;
            }
            return Ok(Flow::Next(Step::Resume(next), min_end));
        }

        let mut count = quantifier.min;
        while count < max {
            match self.match_single_char(&quantifier.body, current) {
                Some(end) => {
                    self.count_step()?;
                    current = end;
                    count += 1;
                }
                None => break,
            }
        }

        if current > min_end {
            self.push_choice(Alternative::GiveBack { min_end, next }, current)?;
        }

        Ok(Flow::Next(Step::Resume(next), current))
    }

    fn match_back_reference(&self, back_reference: &BackReference, pos: usize, next: ContId) -> Flow<'a> {
        // an unset group never matches
        let Some((start, end)) = self.captures.get(back_reference.index).copied().flatten() else {
            return Flow::Fail;
        };

        let Some(captured) = self.text.get(start..end) else {
            return Flow::Fail;
        };

        let mut current = pos;
        for expected in captured.chars() {
            match self.char_at(current) {
                Some(c) if chars_equal(expected, c, self.flags.ignore_case) => {
                    current += c.len_utf8();
                }
                _ => return Flow::Fail,
            }
        }

        Flow::Next(Step::Resume(next), current)
    }

    fn match_look_assertion(
        &mut self,
        look: &'a LookAssertion,
        pos: usize,
        next: ContId,
    ) -> Result<Flow<'a>, RegexError> {
        trace!(
            "look-{} assertion at offset {}",
            if look.direction == Direction::Ahead {
                "ahead"
            } else {
                "behind"
            },
            pos
        );

        // assertions are atomic, the first sub-match decides
        let trail_base = self.trail.len();
        let found = match look.direction {
            Direction::Ahead => self.run(&look.body, pos, ACCEPT)?.is_some(),
            Direction::Behind => self.match_behind(look, pos)?,
        };

        // a negative assertion never leaves captures behind
        if look.negated && found {
            self.undo(trail_base);
        }

        if found != look.negated {
            Ok(Flow::Next(Step::Resume(next), pos))
        } else {
            Ok(Flow::Fail)
        }
    }

    fn match_behind(&mut self, look: &'a LookAssertion, pos: usize) -> Result<bool, RegexError> {
        // try the start offsets from `pos` backwards, only those whose
        // distance (in chars) the body can span.
        let end = self.push_cont(Continuation::AssertEnd(pos));
        let mut start = pos;
        let mut distance = 0;

        let found = loop {
            if look.length.contains(distance) && self.run(&look.body, start, end)?.is_some() {
                break true;
            }

            if look.length.max.is_some_and(|max| distance >= max) {
                break false;
            }

            match self.char_before(start) {
                Some(c) => {
                    start -= c.len_utf8();
                    distance += 1;
                }
                None => break false,
            }
        };

        self.conts.truncate(end);
        Ok(found)
    }
}
