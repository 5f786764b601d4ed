//! Per-node freshness marks.
//!
//! A driver that re-evaluates the same grammar on every keystroke may want to
//! reuse work from the previous pass. The engine does not decide what is
//! reusable; it only reports which nodes a pass touched. The tracker counts
//! passes in epochs and remembers, for each node, the last epoch it was
//! visited in.
//!
//! Nothing in the engine reads these marks back.

use crate::{GrammarNode, NodeUid};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct FreshnessTracker {
    epoch: Cell<u64>,
    visits: RefCell<HashMap<NodeUid, u64>>,
}

impl FreshnessTracker {
    pub fn new() -> Self {
        FreshnessTracker::default()
    }

    /// Start a new pass; marks from earlier passes stop counting as fresh.
    pub fn begin_pass(&self) -> u64 {
        let next = self.epoch.get() + 1;
        self.epoch.set(next);
        next
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    pub fn mark_visited(&self, node: &GrammarNode) {
        self.visits.borrow_mut().insert(node.uid(), self.epoch.get());
    }

    /// Whether `node` was visited during the current pass.
    pub fn is_fresh(&self, node: &GrammarNode) -> bool {
        self.last_visited(node.uid()) == Some(self.epoch.get())
    }

    pub fn last_visited(&self, uid: NodeUid) -> Option<u64> {
        self.visits.borrow().get(&uid).copied()
    }

    /// Number of distinct nodes visited during the current pass.
    pub fn visited_count(&self) -> usize {
        let epoch = self.epoch.get();
        self.visits.borrow().values().filter(|&&e| e == epoch).count()
    }

    /// Forget every mark (epochs keep counting).
    pub fn clear(&self) {
        self.visits.borrow_mut().clear();
    }
}
