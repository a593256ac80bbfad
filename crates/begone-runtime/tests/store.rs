#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use begone_core::{RuleStore, GLOBAL_GROUP};
use begone_runtime::store::{JsonFilePersistence, MemoryPersistence, RulePersistence, SharedRules};

mod support;
use support::{red_store, shared};

#[test]
fn absent_document_is_created_with_defaults() {
    let persistence = Arc::new(MemoryPersistence::new());
    let rules = SharedRules::load_or_init(persistence.clone()).unwrap();

    assert_eq!(persistence.writes(), 1);
    assert_eq!(rules.snapshot().unwrap(), RuleStore::default());
    let doc = persistence.document().unwrap();
    assert!(doc.contains("\"deleteOnDeny\": false"));
    assert!(doc.contains("\"global\""));
}

#[test]
fn existing_document_is_loaded_without_writing() {
    let doc = red_store(true).to_json_pretty().unwrap();
    let persistence = Arc::new(MemoryPersistence::with_document(doc));
    let rules = SharedRules::load_or_init(persistence.clone()).unwrap();

    assert_eq!(persistence.writes(), 0);
    assert_eq!(rules.snapshot().unwrap(), red_store(true));
}

#[test]
fn corrupt_document_refuses_to_load() {
    let persistence = Arc::new(MemoryPersistence::with_document(r#"{"groups": []}"#));
    let err = SharedRules::load_or_init(persistence.clone())
        .err()
        .expect("must fail");
    assert_eq!(err.code().as_str(), "CONFIG_CORRUPT");
    assert_eq!(persistence.writes(), 0);
}

#[test]
fn failed_write_keeps_memory_unchanged() {
    let (rules, persistence) = shared(red_store(false));
    persistence.set_fail_writes(true);

    let err = rules
        .mutate(|s| s.group_mut("red")?.add_category("create"))
        .unwrap_err();
    assert_eq!(err.code().as_str(), "IO");
    assert_eq!(rules.snapshot().unwrap(), red_store(false));

    persistence.set_fail_writes(false);
    rules
        .mutate(|s| s.group_mut("red")?.add_category("create"))
        .unwrap();
    let red = rules.read(|s| s.group("red").unwrap().clone()).unwrap();
    assert!(red.category_blacklist().contains("create"));
    assert_eq!(persistence.writes(), 1);
}

#[test]
fn rejected_mutation_is_not_persisted() {
    let (rules, persistence) = shared(red_store(false));
    let err = rules
        .mutate(|s| s.group_mut("red")?.add_category("wood"))
        .unwrap_err();
    assert_eq!(err.code().as_str(), "RULE_CONFLICT");
    assert_eq!(persistence.writes(), 0);
}

#[test]
fn json_file_round_trip_is_atomic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("itemsbegone_config.json");
    let persistence = Arc::new(JsonFilePersistence::new(&path));
    assert_eq!(persistence.path(), path.as_path());

    assert!(persistence.load().unwrap().is_none());
    let rules = SharedRules::load_or_init(persistence.clone()).unwrap();
    assert!(path.exists());

    rules
        .mutate(|s| {
            s.create_group("red")?;
            s.group_mut("red")?.add_category("wood")
        })
        .unwrap();

    let reloaded = persistence.load().unwrap().unwrap();
    assert_eq!(reloaded, rules.snapshot().unwrap());
    assert!(reloaded.group(GLOBAL_GROUP).is_ok());

    let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn json_file_with_invalid_content_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFilePersistence::new(&path).load().unwrap_err();
    assert_eq!(err.code().as_str(), "CONFIG_CORRUPT");
}
