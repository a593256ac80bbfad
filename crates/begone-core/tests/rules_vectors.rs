//! Rules document vector tests (strict parsing + invariants).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use begone_core::{RuleStore, GLOBAL_GROUP};

mod vector_loader;
use vector_loader::{load, load_store};

#[test]
fn default_document_matches_default_store() {
    let store = load_store("rules_default.json");
    assert_eq!(store, RuleStore::default());
    assert!(!store.delete_on_deny());
    assert_eq!(store.groups().len(), 1);
    assert_eq!(store.groups()[0].name(), GLOBAL_GROUP);
}

#[test]
fn red_team_document_parses() {
    let store = load_store("rules_red_team.json");
    assert!(store.delete_on_deny());
    let red = store.group("red").unwrap();
    assert!(red.enabled());
    assert!(red.category_blacklist().contains("wood"));
    assert!(red.item_blacklist().contains("minecraft:diamond_sword"));
    assert!(!store.group("blue").unwrap().enabled());
}

#[test]
fn corrupt_documents_are_rejected() {
    let files = [
        "rules_missing_delete_on_deny.json",
        "rules_group_missing_field.json",
        "rules_missing_global.json",
        "rules_duplicate_group.json",
        "rules_unknown_field.json",
        "rules_bad_item.json",
    ];

    for f in files {
        let err = RuleStore::from_json(&load(f)).expect_err(f);
        assert_eq!(err.code().as_str(), "CONFIG_CORRUPT", "vector={f}");
    }
}

#[test]
fn pretty_output_reloads_to_the_same_store() {
    let store = load_store("rules_red_team.json");
    let json = store.to_json_pretty().unwrap();
    assert!(json.contains("\"deleteOnDeny\": true"));
    assert!(json.contains("\"categoryBlacklist\""));
    assert_eq!(RuleStore::from_json(&json).unwrap(), store);
}
