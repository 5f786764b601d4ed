//! Behaviour suites that drive the engine through [`Parser`].

mod extensions;

use crate::{GrammarNode, Output, Parser, Phrase};
use std::sync::Arc;

fn parser(sentences: Vec<GrammarNode>) -> Parser {
    let mut parser = Parser::new();
    parser.set_sentences(sentences).expect("valid sentences");
    parser
}

fn parse(sentences: Vec<GrammarNode>, input: &str) -> Vec<Output<'_>> {
    parser(sentences).parse(input)
}

fn shared(phrase: impl Phrase + 'static) -> Arc<dyn Phrase> {
    Arc::new(phrase)
}

/// `(text, is_input)` for each segment.
fn shape<'a>(output: &'a Output<'_>) -> Vec<(&'a str, bool)> {
    output.segments.iter().map(|s| (s.text.as_str(), s.is_input)).collect()
}
