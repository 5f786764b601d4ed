//! Pass metrics.
//!
//! Small counters that make a pass observable without changing it:
//!
//! - The resolver bumps [`Counters`] as it works (cheap `Cell` increments).
//! - The driver snapshots them into a [`PassMetrics`] and adds the timing and
//!   output totals it alone knows about.
//!
//! Because evaluation is lazy, counters only reflect the work done for the
//! outputs that were actually pulled.

use std::cell::Cell;
use std::time::Duration;

/// Summary of one resolution pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PassMetrics {
    /// Wall time from the start of the pass until the snapshot.
    pub elapsed: Duration,
    /// Outputs handed to the caller.
    pub outputs: usize,
    /// Number of `resolve` calls (a node can be visited more than once).
    pub nodes_visited: usize,
    /// Literal matches attempted.
    pub literal_attempts: usize,
    /// Phrase expansions refused by the recursion guard.
    pub pruned_recursions: usize,
    /// Candidates discarded by a phrase filter.
    pub filtered: usize,
    /// Deepest chain of nested phrase expansions seen.
    pub max_phrase_depth: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    visits: Cell<usize>,
    literal_attempts: Cell<usize>,
    pruned: Cell<usize>,
    filtered: Cell<usize>,
    max_depth: Cell<usize>,
}

impl Counters {
    pub(crate) fn visit(&self) {
        self.visits.set(self.visits.get() + 1);
    }

    pub(crate) fn literal_attempt(&self) {
        self.literal_attempts.set(self.literal_attempts.get() + 1);
    }

    pub(crate) fn prune(&self) {
        self.pruned.set(self.pruned.get() + 1);
    }

    pub(crate) fn filter(&self) {
        self.filtered.set(self.filtered.get() + 1);
    }

    pub(crate) fn depth(&self, depth: usize) {
        if depth > self.max_depth.get() {
            self.max_depth.set(depth);
        }
    }

    pub(crate) fn snapshot(&self) -> PassMetrics {
        PassMetrics {
            nodes_visited: self.visits.get(),
            literal_attempts: self.literal_attempts.get(),
            pruned_recursions: self.pruned.get(),
            filtered: self.filtered.get(),
            max_phrase_depth: self.max_depth.get(),
            ..PassMetrics::default()
        }
    }
}
