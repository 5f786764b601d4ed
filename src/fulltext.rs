//! Display helpers that reduce an [`Output`] to plain strings.
//!
//! A *word* is the run of segments one literal emitted (it begins at a
//! segment with `starts_word` set). For an output of `open ` + `ma|il` +
//! ` now|` where `|` separates typed from suggested text:
//!
//! ```text
//! matched     "open "      words fully typed, before the first incomplete one
//! suggestion  "mail"       first incomplete word .. last word with typed text
//! completion  " now"       everything after that
//! ```

use crate::{Output, Segment};

/// Every segment, concatenated.
pub fn all(output: &Output<'_>) -> String {
    output.text()
}

/// The words typed in full before the first incomplete word.
pub fn matched(output: &Output<'_>) -> String {
    let split = Split::of(&output.segments);
    concat(&split.words[..split.first_incomplete])
}

/// From the first incomplete word through the last word holding any input.
pub fn suggestion(output: &Output<'_>) -> String {
    let split = Split::of(&output.segments);
    concat(&split.words[split.first_incomplete..split.completion_start])
}

/// The words after the suggestion.
pub fn completion(output: &Output<'_>) -> String {
    let split = Split::of(&output.segments);
    concat(&split.words[split.completion_start..])
}

struct Split<'a> {
    words: Vec<&'a [Segment]>,
    first_incomplete: usize,
    completion_start: usize,
}

impl<'a> Split<'a> {
    fn of(segments: &'a [Segment]) -> Self {
        let words: Vec<&[Segment]> = segments.chunk_by(|_, next| !next.starts_word).collect();

        let first_incomplete = words.iter().position(|word| word.iter().any(|s| !s.is_input)).unwrap_or(words.len());
        let last_input = words.iter().rposition(|word| word.iter().any(|s| s.is_input));
        let completion_start = match last_input {
            Some(idx) if idx >= first_incomplete => idx + 1,
            _ => (first_incomplete + 1).min(words.len()),
        };

        Split { words, first_incomplete, completion_start }
    }
}

fn concat(words: &[&[Segment]]) -> String {
    words.iter().flat_map(|word| word.iter()).map(|s| s.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Parser, literal, sequence};

    fn word(parts: &[(&str, bool)]) -> Vec<Segment> {
        parts
            .iter()
            .enumerate()
            .map(|(idx, &(text, is_input))| Segment { text: text.into(), is_input, starts_word: idx == 0 })
            .collect()
    }

    fn output(words: &[&[(&str, bool)]]) -> Output<'static> {
        let mut out = Output::seed("");
        out.segments = words.iter().flat_map(|parts| word(parts)).collect();
        out
    }

    #[test]
    fn splits_typed_suggested_and_completed_words() {
        let out = output(&[&[("open ", true)], &[("ma", true), ("il", false)], &[(" now", false)]]);
        assert_eq!(matched(&out), "open ");
        assert_eq!(suggestion(&out), "mail");
        assert_eq!(completion(&out), " now");
        assert_eq!(all(&out), "open mail now");
    }

    #[test]
    fn suggestion_runs_through_last_typed_word() {
        // Fuzzy input can reach past an incomplete word.
        let out = output(&[&[("a", true)], &[("b", false)], &[("c", true)], &[("d", false)]]);
        assert_eq!(matched(&out), "a");
        assert_eq!(suggestion(&out), "bc");
        assert_eq!(completion(&out), "d");
    }

    #[test]
    fn fully_typed_output_has_no_suggestion() {
        let out = output(&[&[("open ", true)], &[("mail", true)]]);
        assert_eq!(matched(&out), "open mail");
        assert_eq!(suggestion(&out), "");
        assert_eq!(completion(&out), "");
    }

    #[test]
    fn empty_input_suggests_the_first_word() {
        let out = output(&[&[("open ", false)], &[("mail", false)]]);
        assert_eq!(matched(&out), "");
        assert_eq!(suggestion(&out), "open ");
        assert_eq!(completion(&out), "mail");
    }

    #[test]
    fn works_on_engine_outputs() {
        let mut parser = Parser::new();
        parser.set_sentences(vec![sequence(vec![literal("open "), literal("mail"), literal(" now")])]).unwrap();
        let out = parser.parse("open m");

        assert_eq!(out.len(), 1);
        assert_eq!(matched(&out[0]), "open ");
        assert_eq!(suggestion(&out[0]), "mail");
        assert_eq!(completion(&out[0]), " now");
    }
}
