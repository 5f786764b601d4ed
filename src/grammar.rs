//! Grammar authoring.
//!
//! Trees are assembled from a handful of constructors and then never touched
//! again:
//!
//! ```text
//! sequence![
//!     literal("open "),
//!     choice![literal("Safari").fuzzy(), literal("Mail").fuzzy()].id("app"),
//! ]
//! ```
//!
//! Builder methods that do not apply to a node kind (for example `fuzzy` on a
//! sequence) leave the node unchanged.

use crate::{Element, GrammarError, GrammarNode, Literal, NodeKind, Phrase, Props, Value};
use std::sync::Arc;

pub fn literal(text: impl Into<String>) -> GrammarNode {
    GrammarNode::new(NodeKind::Literal(Literal { text: text.into(), fuzzy: false, score: None, value: None }))
}

pub fn sequence(children: Vec<GrammarNode>) -> GrammarNode {
    GrammarNode::new(NodeKind::Sequence(children))
}

pub fn choice(children: Vec<GrammarNode>) -> GrammarNode {
    GrammarNode::new(NodeKind::Choice(children))
}

/// An instance of `phrase` with empty props.
pub fn element<P: Phrase + 'static>(phrase: P) -> GrammarNode {
    shared_element(Arc::new(phrase))
}

/// Like [`element`], for a phrase already shared elsewhere.
pub fn shared_element(phrase: Arc<dyn Phrase>) -> GrammarNode {
    GrammarNode::new(NodeKind::Described(Element::new(phrase)))
}

/// A node that never matches.
pub fn nothing() -> GrammarNode {
    GrammarNode::new(NodeKind::Nothing)
}

impl GrammarNode {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn fuzzy(mut self) -> Self {
        if let NodeKind::Literal(lit) = &mut self.kind {
            lit.fuzzy = true;
        }
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        if let NodeKind::Literal(lit) = &mut self.kind {
            lit.score = Some(score);
        }
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        if let NodeKind::Literal(lit) = &mut self.kind {
            lit.value = Some(value.into());
        }
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let NodeKind::Described(element) = &mut self.kind {
            element.props.insert(key.into(), value.into());
        }
        self
    }
}

/// Check the statically known part of a tree.
///
/// Phrase descriptions are not expanded: they are built lazily and may be
/// unbounded.
pub fn validate(node: &GrammarNode) -> Result<(), GrammarError> {
    match &node.kind {
        NodeKind::Literal(lit) => match lit.score {
            Some(score) if !(score > 0.0 && score <= 1.0) => {
                Err(GrammarError::InvalidScore { text: lit.text.clone(), score })
            }
            _ => Ok(()),
        },
        NodeKind::Sequence(children) | NodeKind::Choice(children) => children.iter().try_for_each(validate),
        NodeKind::Described(element) if element.identity().is_empty() => Err(GrammarError::EmptyIdentity),
        NodeKind::Described(_) | NodeKind::Nothing => Ok(()),
    }
}

/// Check a phrase meant to be used as an extension.
pub fn validate_extension(phrase: &dyn Phrase) -> Result<(), GrammarError> {
    let identity = phrase.identity();
    if identity.is_empty() {
        return Err(GrammarError::EmptyIdentity);
    }
    if phrase.supplements().contains(&identity) || phrase.overrides().contains(&identity) {
        return Err(GrammarError::SelfExtension { identity });
    }
    Ok(())
}

type DescribeFn = Box<dyn Fn(&Props) -> GrammarNode + Send + Sync>;
type ValueFn = Box<dyn Fn(&Props, &Value) -> Value + Send + Sync>;
type FilterFn = Box<dyn Fn(&Props, &Value) -> bool + Send + Sync>;

/// A [`Phrase`] assembled from closures.
///
/// Handy for grammars built at runtime. A phrase that needs to mention itself
/// in its own description should be a type implementing [`Phrase`] instead,
/// since a closure cannot name the value it is stored in.
pub struct PhraseDef {
    identity: &'static str,
    describe: DescribeFn,
    get_value: Option<ValueFn>,
    filter: Option<FilterFn>,
    supplements: Vec<&'static str>,
    overrides: Vec<&'static str>,
}

impl PhraseDef {
    pub fn new(identity: &'static str, describe: impl Fn(&Props) -> GrammarNode + Send + Sync + 'static) -> Self {
        PhraseDef {
            identity,
            describe: Box::new(describe),
            get_value: None,
            filter: None,
            supplements: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn with_value(mut self, f: impl Fn(&Props, &Value) -> Value + Send + Sync + 'static) -> Self {
        self.get_value = Some(Box::new(f));
        self
    }

    pub fn with_filter(mut self, f: impl Fn(&Props, &Value) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Box::new(f));
        self
    }

    pub fn supplementing(mut self, identities: &[&'static str]) -> Self {
        self.supplements.extend_from_slice(identities);
        self
    }

    pub fn overriding(mut self, identities: &[&'static str]) -> Self {
        self.overrides.extend_from_slice(identities);
        self
    }
}

impl Phrase for PhraseDef {
    fn identity(&self) -> &'static str {
        self.identity
    }

    fn describe(&self, props: &Props) -> GrammarNode {
        (self.describe)(props)
    }

    fn get_value(&self, props: &Props, result: &Value) -> Option<Value> {
        self.get_value.as_ref().map(|f| f(props, result))
    }

    fn filter(&self, props: &Props, result: &Value) -> bool {
        self.filter.as_ref().is_none_or(|f| f(props, result))
    }

    fn supplements(&self) -> &[&'static str] {
        &self.supplements
    }

    fn overrides(&self) -> &[&'static str] {
        &self.overrides
    }
}

impl std::fmt::Debug for PhraseDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseDef")
            .field("identity", &self.identity)
            .field("describe", &"<function>")
            .field("supplements", &self.supplements)
            .field("overrides", &self.overrides)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_only_touch_matching_kinds() {
        let node = sequence(vec![literal("a")]).fuzzy().score(0.3).value("x").id("seq");
        assert_eq!(node.result_id(), Some("seq"));
        assert!(matches!(node.kind(), NodeKind::Sequence(children) if children.len() == 1));

        let lit = literal("a").fuzzy().score(0.3).value("x");
        match lit.kind() {
            NodeKind::Literal(l) => {
                assert!(l.is_fuzzy());
                assert_eq!(l.score(), Some(0.3));
                assert_eq!(l.value(), Some(&Value::from("x")));
            }
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn element_description_is_built_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let node = element(PhraseDef::new("Counted", |_| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            literal("x")
        }))
        .prop("k", 1);

        let NodeKind::Described(el) = node.kind() else { panic!("expected element") };
        assert!(!el.is_described());
        let first = el.description().uid();
        let second = el.description().uid();
        assert_eq!(first, second);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(el.props().get("k"), Some(&Value::from(1)));
        assert_eq!(node.identity(), Some("Counted"));
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        assert!(validate(&choice(vec![literal("a").score(1.0), literal("b").score(0.01)])).is_ok());

        let err = validate(&sequence(vec![literal("a"), choice(vec![literal("b").score(1.5)])])).unwrap_err();
        assert_eq!(err, GrammarError::InvalidScore { text: "b".into(), score: 1.5 });
        assert!(validate(&literal("c").score(0.0)).is_err());
        assert!(validate(&literal("d").score(f64::NAN)).is_err());
    }

    #[test]
    fn validate_extension_rejects_self_reference() {
        let ok = PhraseDef::new("Extra", |_| literal("x")).supplementing(&["App"]);
        assert!(validate_extension(&ok).is_ok());

        let looping = PhraseDef::new("Loop", |_| literal("x")).overriding(&["Loop"]);
        assert_eq!(validate_extension(&looping), Err(GrammarError::SelfExtension { identity: "Loop" }));

        let anonymous = PhraseDef::new("", |_| literal("x"));
        assert_eq!(validate_extension(&anonymous), Err(GrammarError::EmptyIdentity));
        assert_eq!(validate(&element(PhraseDef::new("", |_| literal("x")))), Err(GrammarError::EmptyIdentity));
    }

    #[test]
    fn uids_are_unique() {
        let a = literal("a");
        let b = literal("a");
        assert_ne!(a.uid(), b.uid());
    }
}
