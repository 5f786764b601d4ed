//! The resolver.
//!
//! This module is the operational core of the engine. [`Resolver`] takes a
//! grammar node and some input and lazily enumerates every way the input can
//! be read as that node:
//!
//! - **Literal** nodes go to the leaf matcher (`literal.rs`).
//! - **Sequence** and **Choice** nodes go to the combinators
//!   (`combinators.rs`), which call back into the resolver for each child.
//! - **Described** nodes (phrase elements) are expanded: the active
//!   extensions for the phrase's identity are looked up, then either the
//!   winning override or the phrase's own description plus its supplements
//!   are resolved. Every candidate goes through the phrase's filter; those
//!   from its own description also go through its value hook (`resolve.rs`).
//! - **Nothing** never matches.
//!
//! Whatever the kind, the node's own `id` wraps each result on the way out
//! and the node is marked in the [`FreshnessTracker`].
//!
//! ## Pass structure
//!
//! A `Resolver` lives for exactly one pass:
//!
//! ```text
//! (0) driver builds ExtensionRegistry from the active extensions
//! (1) Resolver::new(registry, flags, freshness)
//! (2) resolve(root, input)  -> lazy stream, pulled by the caller
//! (3) metrics()             -> counters for the work actually done
//! ```
//!
//! Nothing is evaluated when a stream is created; each stream does its work
//! on the first `next()`. Abandoning a stream abandons the work.
//!
//! ## Recursion
//!
//! Expansion of a phrase is guarded by the path-scoped trace from
//! `guard.rs`; a refused expansion simply yields nothing.

use super::Outputs;
use super::combinators::{match_choice, match_sequence};
use super::freshness::FreshnessTracker;
use super::guard::{RecursionKey, Trace};
use super::literal::{PatternCache, match_literal};
use super::metrics::{Counters, PassMetrics};
use super::registry::ExtensionRegistry;
use super::resolve::{admit, derive, wrap_id};
use crate::{Element, GrammarNode, MatchFlags, NodeKind};

/// Resolves grammar nodes against input for one pass.
///
/// Usage: build with [`Resolver::new`], then call [`Resolver::resolve`] for
/// each root and pull from the returned iterators.
#[derive(Debug)]
pub struct Resolver<'g> {
    registry: ExtensionRegistry<'g>,
    flags: MatchFlags,
    freshness: &'g FreshnessTracker,
    patterns: PatternCache,
    counters: Counters,
}

impl<'g> Resolver<'g> {
    pub fn new(registry: ExtensionRegistry<'g>, flags: MatchFlags, freshness: &'g FreshnessTracker) -> Self {
        tracing::debug!(extensions = registry.len(), ?flags, "starting resolution pass");
        Resolver { registry, flags, freshness, patterns: PatternCache::default(), counters: Counters::default() }
    }

    pub fn registry(&self) -> &ExtensionRegistry<'g> {
        &self.registry
    }

    pub fn flags(&self) -> MatchFlags {
        self.flags
    }

    /// Every interpretation of `input` as `node`, lazily.
    ///
    /// Outputs may leave input unconsumed (see [`crate::Output::remaining`]);
    /// whether that is acceptable is up to the caller.
    pub fn resolve<'s, 'i: 's>(&'s self, node: &'s GrammarNode, input: &'i str) -> Outputs<'s, 'i> {
        self.resolve_traced(node, input, Trace::new())
    }

    /// Counters for the work done so far in this pass.
    pub fn metrics(&self) -> PassMetrics {
        self.counters.snapshot()
    }

    pub(crate) fn resolve_traced<'s, 'i: 's>(
        &'s self,
        node: &'s GrammarNode,
        input: &'i str,
        trace: Trace,
    ) -> Outputs<'s, 'i> {
        Box::new(std::iter::once_with(move || self.dispatch(node, input, trace)).flatten())
    }

    fn dispatch<'s, 'i: 's>(&'s self, node: &'s GrammarNode, input: &'i str, trace: Trace) -> Outputs<'s, 'i> {
        self.freshness.mark_visited(node);
        self.counters.visit();

        let outputs: Outputs<'s, 'i> = match &node.kind {
            NodeKind::Literal(literal) => {
                self.counters.literal_attempt();
                Box::new(match_literal(literal, input, self.flags, &self.patterns).into_iter())
            }
            NodeKind::Sequence(children) => match_sequence(self, children, input, trace),
            NodeKind::Choice(children) => match_choice(self, children, input, trace),
            NodeKind::Described(element) => self.expand(element, input, trace),
            NodeKind::Nothing => Box::new(std::iter::empty()),
        };

        match node.id.as_deref() {
            Some(id) => Box::new(outputs.map(move |out| wrap_id(id, out))),
            None => outputs,
        }
    }

    /// Expand a phrase element through the active extensions.
    ///
    /// ```text
    /// override active?  ── yes ─▶ resolve(override element)
    ///        │ no
    ///        ▼
    /// resolve(description) ─▶ filter, get_value ─┐
    /// resolve(supplement₁) ─▶ filter ────────────┼─▶ chained in this order
    /// resolve(supplement₂) ─▶ filter ────────────┘
    /// ```
    fn expand<'s, 'i: 's>(&'s self, element: &'s Element, input: &'i str, trace: Trace) -> Outputs<'s, 'i> {
        let identity = element.identity();
        let key = RecursionKey { identity, remaining: input.len() };
        if !trace.admits(key) {
            self.counters.prune();
            tracing::trace!(identity, remaining = input.len(), "pruned recursive expansion");
            return Box::new(std::iter::empty());
        }
        let trace = trace.enter(key);
        self.counters.depth(trace.depth());

        if let Some(replacement) = self.registry.override_for(identity) {
            tracing::trace!(identity, by = ?replacement.identity(), "phrase overridden");
            return self.resolve_traced(replacement, input, trace);
        }

        let own = self
            .resolve_traced(element.description(), input, trace.clone())
            .filter_map(move |out| derive(element, out, &self.counters));
        let supplements = self
            .registry
            .supplements_for(identity)
            .iter()
            .flat_map(move |&extension| self.resolve_traced(extension, input, trace.clone()))
            .filter(move |out| admit(element, out, &self.counters));

        Box::new(own.chain(supplements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PhraseDef, choice, element, literal, sequence};
    use serde_json::json;

    fn collect<'i>(node: &GrammarNode, input: &'i str) -> Vec<crate::Output<'i>> {
        let freshness = FreshnessTracker::new();
        let resolver = Resolver::new(ExtensionRegistry::empty(), MatchFlags::empty(), &freshness);
        resolver.resolve(node, input).collect()
    }

    #[test]
    fn nothing_never_matches() {
        assert!(collect(&crate::nothing(), "").is_empty());
        assert!(collect(&crate::nothing().id("x"), "abc").is_empty());
    }

    #[test]
    fn every_node_kind_wraps_its_id() {
        let node = sequence(vec![
            literal("a").value(1).id("lit"),
            choice(vec![literal("b").value(2)]).id("alt"),
            element(PhraseDef::new("C", |_| literal("c").value(3))).id("phrase"),
        ])
        .id("seq");

        let out = collect(&node, "abc");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].result, json!({"seq": {"lit": 1, "alt": 2, "phrase": 3}}));
    }

    #[test]
    fn streams_do_no_work_until_pulled() {
        let freshness = FreshnessTracker::new();
        freshness.begin_pass();
        let resolver = Resolver::new(ExtensionRegistry::empty(), MatchFlags::empty(), &freshness);
        let phrase = element(PhraseDef::new("Lazy", |_| choice(vec![literal("one"), literal("two")])));

        let mut stream = resolver.resolve(&phrase, "");
        assert_eq!(freshness.visited_count(), 0);
        assert_eq!(resolver.metrics().nodes_visited, 0);

        let first = stream.next().unwrap();
        assert_eq!(first.text(), "one");
        // Root, its description and the first alternative; "two" untouched.
        assert_eq!(resolver.metrics().literal_attempts, 1);
        drop(stream);
        assert_eq!(resolver.metrics().literal_attempts, 1);
    }
}
