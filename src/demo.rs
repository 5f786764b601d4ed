//! The grammar the CLI ships with.
//!
//! ```text
//! open <App>        App      = Safari | Mail | Calendar | Maps     (+ extra-apps)
//! call <Contact>    Contact  = Alice | Bob                         (work-contacts replaces it)
//! ```

use parlance::{GrammarNode, Phrase, PhraseDef, Value, choice, element, literal, sequence};
use serde_json::json;
use std::sync::Arc;

/// Names accepted by `--extension`.
pub const EXTENSIONS: &[&str] = &["extra-apps", "work-contacts"];

pub fn sentences() -> Vec<GrammarNode> {
    vec![
        sequence![literal("open ").value("open").id("verb"), element(app()).id("app")].id("command"),
        sequence![literal("call ").value("call").id("verb"), element(contact()).id("contact")].id("command"),
    ]
}

pub fn extension(name: &str) -> Option<Arc<dyn Phrase>> {
    match name {
        "extra-apps" => Some(Arc::new(extra_apps())),
        "work-contacts" => Some(Arc::new(work_contacts())),
        _ => None,
    }
}

fn app() -> PhraseDef {
    PhraseDef::new("App", |_| {
        choice![
            literal("Safari").fuzzy().value("com.apple.Safari"),
            literal("Mail").fuzzy().value("com.apple.mail"),
            literal("Calendar").fuzzy().value("com.apple.iCal"),
            literal("Maps").fuzzy().value("com.apple.Maps"),
        ]
    })
}

fn contact() -> PhraseDef {
    PhraseDef::new("Contact", |_| choice![people("Alice Liddell"), people("Bob Dobbs")])
        .with_value(|_, result| result.get("name").cloned().unwrap_or(Value::Null))
}

fn people(name: &'static str) -> GrammarNode {
    literal(name).fuzzy().value(json!(name)).id("name")
}

fn extra_apps() -> PhraseDef {
    PhraseDef::new("ExtraApps", |_| {
        choice![
            literal("Terminal").fuzzy().value("com.apple.Terminal"),
            literal("Notes").fuzzy().value("com.apple.Notes"),
        ]
    })
    .supplementing(&["App"])
}

fn work_contacts() -> PhraseDef {
    PhraseDef::new("WorkContacts", |_| {
        choice![people("Carol Danvers").score(0.9), people("Dave Lister").score(0.9)]
    })
    .with_value(|_, result| result.get("name").cloned().unwrap_or(Value::Null))
    .overriding(&["Contact"])
}
