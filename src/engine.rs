//! Resolution engine.
//!
//! This module is the entry point for interpreting input against a grammar.
//! The parts are split into focused submodules under `src/engine/` while the
//! public paths stay flat (`crate::engine::Resolver`,
//! `crate::engine::FreshnessTracker`, ...).
//!
//! ## How the parts work together
//!
//! ```text
//! extensions ──┐
//!              │  ExtensionRegistry::new        (registry.rs)
//!              └──────────────┬───────────────
//!                             │
//! root, input ── Resolver::resolve (parser.rs)
//!                   │  Described ─┬─ override?  → resolve override element
//!                   │             └─ description + supplements
//!                   │                 └─ filter / get_value  (resolve.rs)
//!                   │  Literal   ─── match_literal           (literal.rs)
//!                   │  Sequence  ─┐
//!                   │  Choice    ─┴─ combinators             (combinators.rs)
//!                   │  every node ── FreshnessTracker::mark_visited
//!                   v
//!            lazy Iterator<Item = Output>
//! ```
//!
//! Evaluation is pull-based: nothing is matched until the caller asks for the
//! next `Output`, and dropping the iterator stops all work. Self-referential
//! phrases terminate through the path-scoped [`guard::Trace`].
//!
//! ## Responsibilities by module
//!
//! - `parser.rs`: the `Resolver`, dispatching on node kind and expanding
//!   phrases.
//! - `literal.rs`: exact and fuzzy leaf matching, scoring and segmentation.
//! - `combinators.rs`: sequence threading and choice concatenation.
//! - `resolve.rs`: turning raw results into reported values (filter,
//!   `get_value`, id wrapping, sequence merging).
//! - `registry.rs`: per-pass index of active overrides and supplements.
//! - `guard.rs`: recursion keys that keep self-reference finite.
//! - `freshness.rs`: advisory per-node visit marks for incremental drivers.
//! - `metrics.rs`: counters and timing for a pass.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events at `debug`/`trace` level. Install a
//! subscriber (the CLI reads `PARLANCE_LOG`) to see pruning and extension
//! decisions.

#[path = "engine/combinators.rs"]
mod combinators;
#[path = "engine/freshness.rs"]
mod freshness;
#[path = "engine/guard.rs"]
mod guard;
#[path = "engine/literal.rs"]
mod literal;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/resolve.rs"]
mod resolve;

use crate::Output;

/// A lazily evaluated stream of interpretations.
///
/// `'s` bounds the engine state the stream borrows, `'i` the input the
/// produced outputs point into.
pub(crate) type Outputs<'s, 'i> = Box<dyn Iterator<Item = Output<'i>> + 's>;

pub use freshness::FreshnessTracker;
pub use metrics::PassMetrics;
pub use parser::Resolver;
pub use registry::ExtensionRegistry;
