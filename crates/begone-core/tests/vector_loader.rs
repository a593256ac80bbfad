//! JSON rules-document loader shared by core tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use begone_core::RuleStore;

pub fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}"))
        .unwrap_or_else(|e| panic!("missing test vector {name}: {e}"))
}

pub fn load_store(name: &str) -> RuleStore {
    RuleStore::from_json(&load(name)).expect("vector must parse")
}
