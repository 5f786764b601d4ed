//! Literal (leaf) matching.
//!
//! A literal is matched against the *front* of the remaining input and yields
//! at most one [`Output`]. Both modes start by walking text and input in
//! lockstep:
//!
//! ```text
//! text "open"  input "open mail"  -> whole text typed, " mail" left over
//! text "open"  input "op"         -> "op" typed, "en" suggested, nothing left
//! text "open"  input "ox"         -> no match (exact) / try fuzzy
//! ```
//!
//! ## Fuzzy alignment
//!
//! When the lockstep walk fails, a fuzzy literal tries to find every input
//! character inside the text, in order. The alignment decides the score:
//!
//! | alignment                          | score |
//! |------------------------------------|-------|
//! | contiguous, anchored at the start  | 1.0   |
//! | contiguous, later in the text      | 0.5   |
//! | scattered (leftmost subsequence)   | 0.25  |
//!
//! A fuzzy alignment always consumes the whole input. Input that is not a
//! subsequence of the text yields nothing rather than a low score.
//!
//! The contiguous search uses `regex` with the input escaped, so
//! metacharacters in either string are matched literally. Compiled patterns
//! are cached per pass, keyed by the input suffix, because many literals are
//! tried against the same remaining input. The scattered alignment is a
//! single left-to-right walk over the text.
//!
//! An explicit score outside `(0, 1]` is ignored (with a warning) and the
//! computed score is reported instead.

use crate::{Literal, MatchFlags, Output, Segment, Value};
use regex::{Regex, RegexBuilder};
use std::cell::RefCell;
use std::collections::HashMap;

pub(crate) const SCORE_PREFIX: f64 = 1.0;
pub(crate) const SCORE_CONTIGUOUS: f64 = 0.5;
pub(crate) const SCORE_SCATTERED: f64 = 0.25;

/// Match `literal` against the front of `input`.
pub(crate) fn match_literal<'i>(
    literal: &Literal,
    input: &'i str,
    flags: MatchFlags,
    cache: &PatternCache,
) -> Option<Output<'i>> {
    let text = literal.text.as_str();
    let fuzzy = literal.fuzzy || flags.contains(MatchFlags::FUZZY);
    let (text_end, input_end) = shared_prefix(text, input, flags);
    let mut run = SegmentRun::default();

    let (remaining, computed) = if text_end == text.len() {
        run.push(text, true);
        (&input[input_end..], SCORE_PREFIX)
    } else if input_end == input.len() {
        run.push(&text[..text_end], true);
        run.push(&text[text_end..], false);
        ("", SCORE_PREFIX)
    } else if fuzzy {
        let contiguous = cache.get(input, flags);
        ("", fuzzy_align(text, input, contiguous.as_ref(), flags, &mut run)?)
    } else {
        return None;
    };

    Some(Output {
        result: literal.value.clone().unwrap_or(Value::Null),
        remaining,
        segments: run.finish(),
        score: explicit_score(literal).unwrap_or(computed),
    })
}

fn explicit_score(literal: &Literal) -> Option<f64> {
    let score = literal.score?;
    if score > 0.0 && score <= 1.0 {
        return Some(score);
    }
    tracing::warn!(text = %literal.text, score, "ignoring explicit score outside (0, 1]");
    None
}

/// Walk both strings while their characters agree.
///
/// Returns the byte offsets reached in `text` and `input`.
fn shared_prefix(text: &str, input: &str, flags: MatchFlags) -> (usize, usize) {
    let mut text_chars = text.char_indices();
    let mut input_chars = input.char_indices();
    loop {
        match (text_chars.next(), input_chars.next()) {
            (Some((t, a)), Some((i, b))) => {
                if !chars_eq(a, b, flags) {
                    return (t, i);
                }
            }
            (Some((t, _)), None) => return (t, input.len()),
            (None, Some((i, _))) => return (text.len(), i),
            (None, None) => return (text.len(), input.len()),
        }
    }
}

fn chars_eq(a: char, b: char, flags: MatchFlags) -> bool {
    a == b || (flags.contains(MatchFlags::CASE_INSENSITIVE) && a.to_lowercase().eq(b.to_lowercase()))
}

/// Align the whole input inside `text`, pushing segments into `run`.
fn fuzzy_align(
    text: &str,
    input: &str,
    contiguous: Option<&Regex>,
    flags: MatchFlags,
    run: &mut SegmentRun,
) -> Option<f64> {
    if let Some(m) = contiguous.and_then(|re| re.find(text)) {
        run.push(&text[..m.start()], false);
        run.push(m.as_str(), true);
        run.push(&text[m.end()..], false);
        return Some(if m.start() == 0 { SCORE_PREFIX } else { SCORE_CONTIGUOUS });
    }

    scattered_align(text, input, flags, run)?;
    Some(SCORE_SCATTERED)
}

/// Leftmost subsequence alignment: each input character takes the first
/// matching text character after the previous one.
fn scattered_align(text: &str, input: &str, flags: MatchFlags, run: &mut SegmentRun) -> Option<()> {
    let mut pos = 0;
    for wanted in input.chars() {
        let (offset, found) = text[pos..].char_indices().find(|&(_, c)| chars_eq(c, wanted, flags))?;
        let start = pos + offset;
        run.push(&text[pos..start], false);
        pos = start + found.len_utf8();
        run.push(&text[start..pos], true);
    }
    run.push(&text[pos..], false);
    Some(())
}

/// Builds a literal's segments, coalescing runs with the same classification.
#[derive(Debug, Default)]
struct SegmentRun {
    segments: Vec<Segment>,
}

impl SegmentRun {
    fn push(&mut self, text: &str, is_input: bool) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.is_input == is_input => last.text.push_str(text),
            _ => {
                let starts_word = self.segments.is_empty();
                self.segments.push(Segment { text: text.to_string(), is_input, starts_word });
            }
        }
    }

    fn finish(self) -> Vec<Segment> {
        self.segments
    }
}

// --- Pattern cache ------------------------------------------------------------

fn contiguous_pattern(input: &str, flags: MatchFlags) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(input))
        .case_insensitive(flags.contains(MatchFlags::CASE_INSENSITIVE))
        .build()
        .map_err(|err| tracing::warn!(%err, input_len = input.len(), "could not build fuzzy pattern"))
        .ok()
}

/// Contiguous-match patterns compiled during one pass, keyed by input suffix.
///
/// The flags a pass runs with never change, so they are not part of the key.
/// A pattern that failed to build is cached as `None`; alignment then falls
/// back to the scattered walk.
#[derive(Debug, Default)]
pub(crate) struct PatternCache {
    patterns: RefCell<HashMap<String, Option<Regex>>>,
}

impl PatternCache {
    fn get(&self, input: &str, flags: MatchFlags) -> Option<Regex> {
        if let Some(hit) = self.patterns.borrow().get(input) {
            return hit.clone();
        }
        let built = contiguous_pattern(input, flags);
        self.patterns.borrow_mut().insert(input.to_string(), built.clone());
        built
    }

    pub(crate) fn len(&self) -> usize {
        self.patterns.borrow().len()
    }
}
