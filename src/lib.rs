extern crate self as parlance;

use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Map;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
pub mod fulltext;
pub mod grammar;

#[cfg(test)]
mod tests;

pub use api::{MatchFlags, Options, ParseDetails, Parser, Pass, rank};
pub use engine::{ExtensionRegistry, FreshnessTracker, PassMetrics, Resolver};
pub use error::GrammarError;
pub use grammar::{PhraseDef, choice, element, literal, nothing, sequence, shared_element};
pub use serde_json::Value;

/// Author-supplied configuration attached to a phrase element.
pub type Props = Map<String, Value>;

// --- Phrases ----------------------------------------------------------------

/// A reusable, named grammar unit that describes itself in terms of other
/// grammar nodes.
///
/// The `identity` is what recursion guarding and extension lookup key on: two
/// elements built from the same phrase share it no matter where they appear
/// in a tree. `describe` may return a tree that contains the phrase itself;
/// it is only called when an element is first resolved, so recursive phrases
/// never build an infinite tree up front.
pub trait Phrase: Send + Sync {
    fn identity(&self) -> &'static str;

    fn describe(&self, props: &Props) -> GrammarNode;

    /// Derive the value reported for a raw description result.
    ///
    /// `None` means the phrase has no value hook and the raw result passes
    /// through untouched.
    fn get_value(&self, _props: &Props, _result: &Value) -> Option<Value> {
        None
    }

    /// Return `false` to discard a candidate interpretation.
    fn filter(&self, _props: &Props, _result: &Value) -> bool {
        true
    }

    /// Identities this phrase adds alternatives to while it is an active extension.
    fn supplements(&self) -> &[&'static str] {
        &[]
    }

    /// Identities this phrase replaces while it is an active extension.
    fn overrides(&self) -> &[&'static str] {
        &[]
    }
}

// --- Grammar nodes ----------------------------------------------------------

/// Process-unique identifier of a grammar node, used for freshness tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeUid(u64);

impl NodeUid {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        NodeUid(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// One immutable unit of a grammar.
///
/// Nodes are built once (see [`grammar`]) and only read afterwards. The
/// optional `id` names the node's result when it is merged into its parent.
#[derive(Debug)]
pub struct GrammarNode {
    pub(crate) uid: NodeUid,
    pub(crate) id: Option<String>,
    pub(crate) kind: NodeKind,
}

#[derive(Debug)]
pub enum NodeKind {
    Literal(Literal),
    Sequence(Vec<GrammarNode>),
    /// Alternatives; declaration order is also the tie-break order.
    Choice(Vec<GrammarNode>),
    Described(Element),
    /// A node that can never match.
    Nothing,
}

impl GrammarNode {
    pub(crate) fn new(kind: NodeKind) -> Self {
        GrammarNode { uid: NodeUid::next(), id: None, kind }
    }

    pub fn uid(&self) -> NodeUid {
        self.uid
    }

    /// The key this node's result is wrapped under, if any.
    pub fn result_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Phrase identity for `Described` nodes.
    pub fn identity(&self) -> Option<&'static str> {
        match &self.kind {
            NodeKind::Described(element) => Some(element.identity()),
            _ => None,
        }
    }
}

/// Literal text, matched exactly (as a typed prefix) or fuzzily.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub(crate) text: String,
    pub(crate) fuzzy: bool,
    /// Explicit score; replaces whatever the matcher computes.
    pub(crate) score: Option<f64>,
    pub(crate) value: Option<Value>,
}

impl Literal {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_fuzzy(&self) -> bool {
        self.fuzzy
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

/// An instance of a [`Phrase`] inside a grammar tree, with its props.
///
/// The description is produced on first use and kept, so the nodes under an
/// element keep their [`NodeUid`]s across passes.
pub struct Element {
    pub(crate) phrase: Arc<dyn Phrase>,
    pub(crate) props: Props,
    description: OnceCell<Box<GrammarNode>>,
}

impl Element {
    pub(crate) fn new(phrase: Arc<dyn Phrase>) -> Self {
        Element { phrase, props: Props::new(), description: OnceCell::new() }
    }

    pub fn identity(&self) -> &'static str {
        self.phrase.identity()
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn phrase(&self) -> &dyn Phrase {
        self.phrase.as_ref()
    }

    /// The phrase's description, built on first access.
    pub fn description(&self) -> &GrammarNode {
        self.description.get_or_init(|| Box::new(self.phrase.describe(&self.props)))
    }

    /// Whether [`Element::description`] has been built yet.
    pub fn is_described(&self) -> bool {
        self.description.get().is_some()
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("identity", &self.identity())
            .field("props", &self.props)
            .field("described", &self.is_described())
            .finish()
    }
}

// --- Outputs ----------------------------------------------------------------

/// A run of literal text, either typed by the user or offered as completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    /// `true` when the text was matched against typed input.
    pub is_input: bool,
    /// `true` on the first segment a literal emits.
    pub starts_word: bool,
}

impl Segment {
    pub fn input(text: impl Into<String>) -> Self {
        Segment { text: text.into(), is_input: true, starts_word: false }
    }

    pub fn suggestion(text: impl Into<String>) -> Self {
        Segment { text: text.into(), is_input: false, starts_word: false }
    }
}

/// One interpretation of the input.
///
/// `remaining` is always a suffix of the input handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output<'i> {
    pub result: Value,
    pub remaining: &'i str,
    pub segments: Vec<Segment>,
    /// Match quality in `(0, 1]`.
    pub score: f64,
}

impl<'i> Output<'i> {
    /// The starting point of a sequence: nothing consumed, nothing matched.
    pub(crate) fn seed(input: &'i str) -> Self {
        Output { result: Value::Object(Map::new()), remaining: input, segments: Vec::new(), score: 1.0 }
    }

    pub(crate) fn with_result(self, result: Value) -> Self {
        Output { result, ..self }
    }

    /// All segment text in order, i.e. the full text this interpretation represents.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Whether every character of the input was consumed.
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}
