use super::{parser, shared};
use crate::{GrammarError, PhraseDef, element, fulltext, literal};
use serde_json::json;

fn extended() -> PhraseDef {
    PhraseDef::new("Extended", |_| literal("test a"))
}

fn extender() -> PhraseDef {
    PhraseDef::new("Extender", |_| literal("test b")).supplementing(&["Extended"])
}

fn overrider(identity: &'static str, text: &'static str) -> PhraseDef {
    PhraseDef::new(identity, move |_| literal(text)).overriding(&["Extended"])
}

#[test]
fn supplements_follow_the_phrase_own_results() {
    let mut parser = parser(vec![element(extended())]);
    parser.set_extensions(vec![shared(extender())]).unwrap();

    let data = parser.parse("t");
    assert_eq!(data.len(), 2);
    assert_eq!(fulltext::suggestion(&data[0]), "test a");
    assert_eq!(fulltext::suggestion(&data[1]), "test b");
}

#[test]
fn removed_supplements_stop_applying() {
    let mut parser = parser(vec![element(extended())]);
    parser.set_extensions(vec![shared(extender())]).unwrap();

    let first = parser.parse("t");
    assert_eq!(first.len(), 2);
    assert_eq!(fulltext::all(&first[0]), "test a");
    assert_eq!(fulltext::all(&first[1]), "test b");

    parser.set_extensions(Vec::new()).unwrap();
    let second = parser.parse("t");
    assert_eq!(second.len(), 1);
    assert_eq!(fulltext::all(&second[0]), "test a");
}

#[test]
fn overrides_replace_the_phrase() {
    let mut parser = parser(vec![element(extended())]);
    parser.set_extensions(vec![shared(overrider("Overrider", "test b"))]).unwrap();

    let data = parser.parse("t");
    assert_eq!(data.len(), 1);
    assert_eq!(fulltext::suggestion(&data[0]), "test b");
}

#[test]
fn last_registered_override_wins() {
    let mut parser = parser(vec![element(extended())]);
    parser
        .set_extensions(vec![shared(overrider("First", "test b")), shared(overrider("Second", "test c"))])
        .unwrap();

    let texts: Vec<String> = parser.parse("t").iter().map(fulltext::all).collect();
    assert_eq!(texts, vec!["test c"]);
}

#[test]
fn override_skips_the_replaced_phrase_hooks() {
    let guarded = PhraseDef::new("Extended", |_| literal("test a").value("a"))
        .with_filter(|_, _| false)
        .with_value(|_, _| json!("never"));
    let mut parser = parser(vec![element(guarded).id("slot")]);
    assert!(parser.parse("t").is_empty());

    let replacement = PhraseDef::new("Replacement", |_| literal("test b").value("b")).overriding(&["Extended"]);
    parser.set_extensions(vec![shared(replacement)]).unwrap();

    let data = parser.parse("t");
    assert_eq!(data.len(), 1);
    // The node's own id still applies.
    assert_eq!(data[0].result, json!({"slot": "b"}));
}

#[test]
fn supplements_apply_wherever_the_phrase_appears() {
    let mut parser = parser(vec![
        sequence![literal("x "), element(extended())],
        sequence![literal("y "), element(extended())],
    ]);
    parser.set_extensions(vec![shared(extender())]).unwrap();

    let texts: Vec<String> = parser.parse("").iter().map(fulltext::all).collect();
    assert_eq!(texts, vec!["x test a", "x test b", "y test a", "y test b"]);
}

#[test]
fn overridden_phrases_lose_their_supplements() {
    let mut parser = parser(vec![element(extended())]);
    parser.set_extensions(vec![shared(extender()), shared(overrider("Overrider", "test c"))]).unwrap();

    let texts: Vec<String> = parser.parse("t").iter().map(fulltext::all).collect();
    assert_eq!(texts, vec!["test c"]);
}

#[test]
fn extensions_are_validated() {
    let mut parser = parser(vec![element(extended())]);
    let looping = PhraseDef::new("Extended", |_| literal("x")).supplementing(&["Extended"]);

    let err = parser.set_extensions(vec![shared(extender()), shared(looping)]).unwrap_err();
    assert_eq!(err, GrammarError::SelfExtension { identity: "Extended" });
    assert!(parser.extensions().is_empty());
}

#[test]
fn verbose_details_name_active_extensions() {
    let mut parser = parser(vec![element(extended())]);
    parser.set_extensions(vec![shared(extender())]).unwrap();

    let details = parser.parse_verbose("t");
    assert_eq!(details.extensions, vec!["Extender"]);
    assert_eq!(details.outputs.len(), 2);
}

#[test]
fn target_filter_applies_to_supplement_results() {
    let target = PhraseDef::new("Target", |_| literal("test a").value("a"))
        .with_filter(|_, result| result != &json!("b"))
        .with_value(|_, result| json!({"own": result}));
    let mut parser = parser(vec![element(target)]);
    parser
        .set_extensions(vec![
            shared(PhraseDef::new("Rejected", |_| literal("test b").value("b")).supplementing(&["Target"])),
            shared(PhraseDef::new("Kept", |_| literal("test c").value("c")).supplementing(&["Target"])),
        ])
        .unwrap();

    let details = parser.parse_verbose("t");
    let results: Vec<_> = details.outputs.iter().map(|o| o.result.clone()).collect();
    // Supplement results skip the target's value hook.
    assert_eq!(results, vec![json!({"own": "a"}), json!("c")]);
    assert_eq!(details.metrics.filtered, 1);
}
