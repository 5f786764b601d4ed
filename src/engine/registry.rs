//! Extension indexing.
//!
//! Extensions are phrases that rewrite other phrases by identity:
//!
//! - a **supplement** adds its own description as an extra alternative next
//!   to the target phrase;
//! - an **override** replaces the target phrase's description entirely.
//!
//! The grammar tree itself is never modified. Instead each pass builds an
//! [`ExtensionRegistry`] from the extensions active for that pass and the
//! resolver consults it whenever it expands a phrase. Rebuilding per pass is
//! what makes extensions non-sticky: drop an extension from the active list
//! and its supplements and overrides are gone from the next pass.
//!
//! ## Invariants
//!
//! - Every indexed node is a `Described` node (extensions are phrase
//!   elements); anything else handed to [`ExtensionRegistry::new`] is skipped.
//! - Per target, nodes are kept in registration order. For overrides the last
//!   registered one wins.

use crate::{GrammarNode, NodeKind};
use std::collections::HashMap;

#[derive(Default, Debug)]
struct ExtensionIndex<'g> {
    overrides: HashMap<&'static str, Vec<&'g GrammarNode>>,
    supplements: HashMap<&'static str, Vec<&'g GrammarNode>>,
}

/// Active overrides and supplements keyed by the identity they target.
#[derive(Default, Debug)]
pub struct ExtensionRegistry<'g> {
    count: usize,
    index: ExtensionIndex<'g>,
}

impl<'g> ExtensionRegistry<'g> {
    /// Index `extensions`, in order.
    pub fn new(extensions: &'g [GrammarNode]) -> Self {
        let mut index = ExtensionIndex::default();
        let mut count = 0;

        for node in extensions {
            let NodeKind::Described(element) = &node.kind else {
                tracing::warn!(uid = ?node.uid(), "ignoring extension that is not a phrase element");
                continue;
            };
            count += 1;

            let phrase = element.phrase();
            for &target in phrase.supplements() {
                index.supplements.entry(target).or_default().push(node);
            }
            for &target in phrase.overrides() {
                index.overrides.entry(target).or_default().push(node);
            }
        }

        ExtensionRegistry { count, index }
    }

    pub fn empty() -> Self {
        ExtensionRegistry::default()
    }

    /// Number of extensions indexed.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Active overrides of `identity`, in registration order.
    pub fn overrides_for(&self, identity: &str) -> &[&'g GrammarNode] {
        self.index.overrides.get(identity).map(Vec::as_slice).unwrap_or_default()
    }

    /// Active supplements of `identity`, in registration order.
    pub fn supplements_for(&self, identity: &str) -> &[&'g GrammarNode] {
        self.index.supplements.get(identity).map(Vec::as_slice).unwrap_or_default()
    }

    /// The override that takes effect for `identity`: the last registered one.
    pub fn override_for(&self, identity: &str) -> Option<&'g GrammarNode> {
        self.overrides_for(identity).last().copied()
    }
}
