//! Result derivation.
//!
//! Matching produces raw results; this module turns them into the values a
//! node reports to its parent:
//!
//! ```text
//! description output ──▶ filter(raw) ──false──▶ dropped
//!                            │true
//!                            ▼
//!                       get_value(raw) ──▶ replaces result (if the phrase has one)
//!                            │
//!                            ▼
//!                    wrap_id (node id) ──▶ { id: result }
//!
//! supplement output  ──▶ filter(raw) ──false──▶ dropped
//!                            │true
//!                            ▼
//!                    wrap_id (node id)
//! ```
//!
//! A phrase's filter sees every candidate offered for it, supplements
//! included. `get_value` only applies to its own description.
//!
//! Wrapping comes last because it is how a result is handed to the parent;
//! a phrase's `get_value` therefore always sees its description's result
//! unwrapped. Nested nodes that reuse an id each add their own level.
//!
//! Sequences fold child results together with [`merge_step`].

use super::metrics::Counters;
use crate::{Element, Output, Value};
use serde_json::Map;

/// Whether the phrase's filter keeps `output`.
pub(crate) fn admit(element: &Element, output: &Output<'_>, counters: &Counters) -> bool {
    let keep = element.phrase().filter(element.props(), &output.result);
    if !keep {
        counters.filter();
        tracing::trace!(identity = element.identity(), "candidate rejected by filter");
    }
    keep
}

/// Apply a phrase's filter and value hook to one raw description output.
pub(crate) fn derive<'i>(element: &Element, output: Output<'i>, counters: &Counters) -> Option<Output<'i>> {
    if !admit(element, &output, counters) {
        return None;
    }

    match element.phrase().get_value(element.props(), &output.result) {
        Some(value) => Some(output.with_result(value)),
        None => Some(output),
    }
}

/// Wrap an output's result as `{ id: result }`.
pub(crate) fn wrap_id<'i>(id: &str, output: Output<'i>) -> Output<'i> {
    let Output { result, remaining, segments, score } = output;
    let mut wrapped = Map::new();
    wrapped.insert(id.to_string(), result);
    Output { result: Value::Object(wrapped), remaining, segments, score }
}

/// Extend a sequence's partial output with its `index`-th child's output.
///
/// - object results merge key-wise (later keys win);
/// - other non-null results are stored under the child's position (`"0"`, `"1"`, ...);
/// - `null` contributes nothing.
///
/// Segments concatenate, scores multiply and the child's leftover input
/// becomes the sequence's.
pub(crate) fn merge_step<'i>(acc: &Output<'i>, index: usize, child: Output<'i>) -> Output<'i> {
    let mut result = match &acc.result {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    match child.result {
        Value::Object(map) => result.extend(map),
        Value::Null => {}
        other => {
            result.insert(index.to_string(), other);
        }
    }

    let mut segments = acc.segments.clone();
    segments.extend(child.segments);

    Output { result: Value::Object(result), remaining: child.remaining, segments, score: acc.score * child.score }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeKind, PhraseDef, Segment, element, literal};
    use serde_json::json;

    fn output<'i>(result: Value, remaining: &'i str, text: &str, score: f64) -> Output<'i> {
        Output { result, remaining, segments: vec![Segment::input(text)], score }
    }

    #[test]
    fn wrap_nests_identical_ids() {
        let out = output(json!("val"), "", "disp", 1.0);
        let out = wrap_id("test", wrap_id("test", out));
        assert_eq!(out.result, json!({"test": {"test": "val"}}));
        assert_eq!(out.text(), "disp");
    }

    #[test]
    fn merge_combines_keys_positions_and_scores() {
        let seed = Output::seed("open mail");
        let step = merge_step(&seed, 0, output(json!({"verb": "open"}), "mail", "open ", 1.0));
        let step = merge_step(&step, 1, output(json!("mail"), "", "mail", 0.5));
        let step = merge_step(&step, 2, output(Value::Null, "", "", 0.5));

        assert_eq!(step.result, json!({"verb": "open", "1": "mail"}));
        assert_eq!(step.score, 0.25);
        assert_eq!(step.text(), "open mail");
        assert_eq!(step.remaining, "");
        // The accumulated output is left untouched.
        assert_eq!(seed.result, json!({}));
        assert!(seed.segments.is_empty());
    }

    #[test]
    fn derive_applies_filter_then_value() {
        let node = element(
            PhraseDef::new("Upper", |_| literal("x"))
                .with_filter(|_, result| result != &json!("skip"))
                .with_value(|props, result| json!({"raw": result, "props": props})),
        )
        .prop("k", "v");
        let NodeKind::Described(el) = node.kind() else { panic!("expected element") };
        let counters = Counters::default();

        assert!(derive(el, output(json!("skip"), "", "x", 1.0), &counters).is_none());
        assert_eq!(counters.snapshot().filtered, 1);

        let kept = derive(el, output(json!("keep"), "", "x", 1.0), &counters).unwrap();
        assert_eq!(kept.result, json!({"raw": "keep", "props": {"k": "v"}}));
    }

    #[test]
    fn admit_only_runs_the_filter() {
        let node = element(PhraseDef::new("Odd", |_| literal("x")).with_filter(|_, result| result != &json!(2)));
        let NodeKind::Described(el) = node.kind() else { panic!("expected element") };
        let counters = Counters::default();

        assert!(admit(el, &output(json!(1), "", "x", 1.0), &counters));
        assert!(!admit(el, &output(json!(2), "", "x", 1.0), &counters));
        assert_eq!(counters.snapshot().filtered, 1);
    }
}
