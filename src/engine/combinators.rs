//! Sequence and choice.
//!
//! Both combinators only wire child streams together; all matching happens in
//! the children. Streams stay lazy: a sequence does not look at its second
//! child until the first one has produced an output, and a choice does not
//! start its second alternative until the first is exhausted.
//!
//! ```text
//! sequence [a, b]      seed ─▶ a ─▶ (out₁) ─▶ b ─▶ emit
//!                                 └▶ (out₂) ─▶ b ─▶ emit
//!
//! choice [a, b]        input ─▶ a ─▶ emit all
//!                      input ─▶ b ─▶ emit all
//! ```

use super::Outputs;
use super::guard::Trace;
use super::parser::Resolver;
use super::resolve::merge_step;
use crate::{GrammarNode, Output};

/// Thread the input through `children` in order.
///
/// A branch dies as soon as one child yields nothing for it.
pub(crate) fn match_sequence<'s, 'g: 's, 'i: 's>(
    resolver: &'s Resolver<'g>,
    children: &'s [GrammarNode],
    input: &'i str,
    trace: Trace,
) -> Outputs<'s, 'i> {
    extend_sequence(resolver, children, 0, Output::seed(input), trace)
}

fn extend_sequence<'s, 'g: 's, 'i: 's>(
    resolver: &'s Resolver<'g>,
    children: &'s [GrammarNode],
    index: usize,
    acc: Output<'i>,
    trace: Trace,
) -> Outputs<'s, 'i> {
    let Some(child) = children.get(index) else {
        return Box::new(std::iter::once(acc));
    };

    let steps = resolver.resolve_traced(child, acc.remaining, trace.clone());
    Box::new(steps.flat_map(move |out| {
        let next = merge_step(&acc, index, out);
        extend_sequence(resolver, children, index + 1, next, trace.clone())
    }))
}

/// Every child against the same input, streams concatenated in declaration order.
pub(crate) fn match_choice<'s, 'g: 's, 'i: 's>(
    resolver: &'s Resolver<'g>,
    children: &'s [GrammarNode],
    input: &'i str,
    trace: Trace,
) -> Outputs<'s, 'i> {
    Box::new(children.iter().flat_map(move |child| resolver.resolve_traced(child, input, trace.clone())))
}
