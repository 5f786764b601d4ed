//! Recursion guarding.
//!
//! A phrase may mention itself, directly or through other phrases, so the
//! grammar is a graph rather than a tree. Expanding it naively never ends:
//! every unwinding of `Test → … → Test` is another candidate, and at the end
//! of the input each one is a valid (pure suggestion) interpretation.
//!
//! The resolver threads a [`Trace`] down each resolution path. It records
//! which phrase identities are being expanded and how much input was left
//! when each was entered.
//!
//! ## When an expansion is pruned
//!
//! Entering identity `X` with `r` bytes of input left is refused when `X` is
//! already on the path and either
//!
//! - it was entered with the same `r` (a zero-width cycle), or
//! - `r == 0` (nothing is left to consume, so any further unwinding is a pure
//!   completion that repeats without end).
//!
//! Recursion that consumes input between occurrences is still allowed.
//!
//! ## Scoping
//!
//! A `Trace` is a persistent linked list: extending it never changes the
//! parent's view. Sibling branches of a choice and successive steps of a
//! sequence each see only their own ancestors, never frames pushed by a
//! branch that was backtracked out of.

use std::rc::Rc;

/// Identity plus remaining input length at the time a phrase was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RecursionKey {
    pub(crate) identity: &'static str,
    pub(crate) remaining: usize,
}

#[derive(Debug)]
struct Frame {
    key: RecursionKey,
    parent: Option<Rc<Frame>>,
}

/// The phrases currently being expanded along one resolution path.
#[derive(Debug, Clone, Default)]
pub(crate) struct Trace {
    head: Option<Rc<Frame>>,
}

impl Trace {
    pub(crate) fn new() -> Self {
        Trace::default()
    }

    /// Whether `key.identity` may be expanded here.
    pub(crate) fn admits(&self, key: RecursionKey) -> bool {
        !self
            .frames()
            .any(|frame| frame.identity == key.identity && (frame.remaining == key.remaining || key.remaining == 0))
    }

    /// A new trace with `key` pushed on top of this one.
    pub(crate) fn enter(&self, key: RecursionKey) -> Trace {
        Trace { head: Some(Rc::new(Frame { key, parent: self.head.clone() })) }
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames().count()
    }

    fn frames(&self) -> impl Iterator<Item = RecursionKey> + '_ {
        std::iter::successors(self.head.as_deref(), |frame| frame.parent.as_deref()).map(|frame| frame.key)
    }
}
