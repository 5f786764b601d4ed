use crate::engine::{ExtensionRegistry, FreshnessTracker, PassMetrics, Resolver};
use crate::grammar::{shared_element, validate, validate_extension};
use crate::{GrammarError, GrammarNode, NodeKind, Output, Phrase};
use std::cell::Cell;
use std::sync::Arc;
use std::time::Instant;

bitflags::bitflags! {
    /// How literal text is compared with input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MatchFlags: u8 {
        /// Fold case when comparing characters (exact and fuzzy).
        const CASE_INSENSITIVE = 1 << 0;
        /// Treat every literal as fuzzy.
        const FUZZY            = 1 << 1;
    }
}

impl Default for MatchFlags {
    fn default() -> Self {
        MatchFlags::empty()
    }
}

/// Options that affect a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Options {
    pub flags: MatchFlags,
    /// Stop after this many outputs. The engine never bounds its own work;
    /// this is how a driver does.
    pub limit: Option<usize>,
}

/// Holds the root grammars and active extensions and runs passes over them.
///
/// Usage: set sentences (and optionally extensions), then call
/// [`Parser::parse`] on every input change, or [`Parser::pass`] to pull
/// outputs lazily.
///
/// ```text
/// set_sentences / set_extensions  (validated once)
///        │
///        ▼
/// pass() ── new freshness epoch + ExtensionRegistry ── Pass
///        │
///        ▼
/// Pass::parse(input) ── every sentence, in order ── complete outputs only
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    sentences: Vec<GrammarNode>,
    extensions: Vec<GrammarNode>,
    options: Options,
    freshness: FreshnessTracker,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    pub fn with_options(options: Options) -> Self {
        Parser { options, ..Parser::default() }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn sentences(&self) -> &[GrammarNode] {
        &self.sentences
    }

    /// Replace the root grammars. Nothing changes if any of them is invalid.
    pub fn set_sentences(&mut self, sentences: Vec<GrammarNode>) -> Result<(), GrammarError> {
        sentences.iter().try_for_each(validate)?;
        self.sentences = sentences;
        Ok(())
    }

    /// Extension elements, in registration order.
    pub fn extensions(&self) -> &[GrammarNode] {
        &self.extensions
    }

    /// Replace the active extensions; takes effect from the next pass.
    ///
    /// Phrases that were already active keep their element (and so their
    /// built description and node uids).
    pub fn set_extensions(&mut self, extensions: Vec<Arc<dyn Phrase>>) -> Result<(), GrammarError> {
        extensions.iter().try_for_each(|phrase| validate_extension(phrase.as_ref()))?;

        let mut previous = std::mem::take(&mut self.extensions);
        self.extensions = extensions
            .into_iter()
            .map(|phrase| {
                let kept = previous.iter().position(
                    |node| matches!(&node.kind, NodeKind::Described(element) if Arc::ptr_eq(&element.phrase, &phrase)),
                );
                match kept {
                    Some(idx) => previous.swap_remove(idx),
                    None => shared_element(phrase),
                }
            })
            .collect();
        Ok(())
    }

    pub fn freshness(&self) -> &FreshnessTracker {
        &self.freshness
    }

    /// Start a pass with the current extension set.
    pub fn pass(&self) -> Pass<'_> {
        let epoch = self.freshness.begin_pass();
        tracing::debug!(epoch, sentences = self.sentences.len(), "pass started");

        Pass {
            resolver: Resolver::new(ExtensionRegistry::new(&self.extensions), self.options.flags, &self.freshness),
            sentences: &self.sentences,
            limit: self.options.limit,
            started: Instant::now(),
            emitted: Cell::new(0),
        }
    }

    /// Run one pass over `input` and collect its outputs.
    pub fn parse<'i>(&self, input: &'i str) -> Vec<Output<'i>> {
        self.pass().parse(input).collect()
    }

    /// Like [`Parser::parse`], with metrics for the pass.
    pub fn parse_verbose<'i>(&self, input: &'i str) -> ParseDetails<'i> {
        let pass = self.pass();
        let outputs: Vec<Output<'i>> = pass.parse(input).collect();
        let metrics = pass.metrics();
        let extensions = self.extensions.iter().filter_map(GrammarNode::identity).collect();

        ParseDetails { input, outputs, metrics, extensions }
    }
}

/// One resolution pass: a fixed extension set and a fresh freshness epoch.
#[derive(Debug)]
pub struct Pass<'g> {
    resolver: Resolver<'g>,
    sentences: &'g [GrammarNode],
    limit: Option<usize>,
    started: Instant,
    emitted: Cell<usize>,
}

impl<'g> Pass<'g> {
    /// Outputs of every sentence, in sentence order, that consume all of `input`.
    pub fn parse<'s, 'i: 's>(&'s self, input: &'i str) -> impl Iterator<Item = Output<'i>> + 's {
        self.sentences
            .iter()
            .flat_map(move |root| self.resolver.resolve(root, input))
            .filter(Output::is_complete)
            .inspect(move |_| self.emitted.set(self.emitted.get() + 1))
            .take(self.limit.unwrap_or(usize::MAX))
    }

    pub fn resolver(&self) -> &Resolver<'g> {
        &self.resolver
    }

    pub fn metrics(&self) -> PassMetrics {
        PassMetrics { elapsed: self.started.elapsed(), outputs: self.emitted.get(), ..self.resolver.metrics() }
    }
}

/// Result of [`Parser::parse_verbose`].
#[derive(Debug, Clone)]
pub struct ParseDetails<'i> {
    pub input: &'i str,
    pub outputs: Vec<Output<'i>>,
    pub metrics: PassMetrics,
    /// Identities of the extensions active for the pass.
    pub extensions: Vec<&'static str>,
}

/// Order outputs by descending score; equal scores keep their order.
pub fn rank(mut outputs: Vec<Output<'_>>) -> Vec<Output<'_>> {
    outputs.sort_by(|a, b| b.score.total_cmp(&a.score));
    outputs
}
