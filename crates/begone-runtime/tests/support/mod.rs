//! Fakes shared by runtime integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Arc;

use begone_core::{Group, ObjectId, RuleStore, GLOBAL_GROUP};
use begone_runtime::context::OperatorSource;
use begone_runtime::host::{Actor, HeldObject, StaticRegistry};
use begone_runtime::store::{MemoryPersistence, SharedRules};

pub fn id(s: &str) -> ObjectId {
    ObjectId::parse(s).unwrap()
}

pub fn held(s: &str, count: u32) -> HeldObject {
    HeldObject::new(id(s), count)
}

/// `global` (empty) + `red` (blacklists the `wood` namespace).
pub fn red_store(delete_on_deny: bool) -> RuleStore {
    RuleStore::new(
        delete_on_deny,
        vec![
            Group::new(GLOBAL_GROUP),
            Group::new("red").with_category("wood"),
        ],
    )
    .unwrap()
}

pub fn shared(store: RuleStore) -> (SharedRules, Arc<MemoryPersistence>) {
    let persistence = Arc::new(MemoryPersistence::new());
    let rules = SharedRules::new(store, persistence.clone());
    (rules, persistence)
}

pub fn registry() -> Arc<StaticRegistry> {
    Arc::new(
        StaticRegistry::new(
            [
                "minecraft:stone",
                "minecraft:tnt",
                "minecraft:diamond_sword",
                "wood:plank",
                "wood:log",
                "create:cogwheel",
            ]
            .into_iter()
            .map(id),
        )
        .with_groups(["red".to_string(), "blue".to_string()]),
    )
}

pub fn operator(level: u8) -> OperatorSource {
    OperatorSource::new("test-operator", level)
}

#[derive(Debug)]
pub struct FakeActor {
    pub name: String,
    pub group: Option<String>,
    pub slots: Vec<Option<HeldObject>>,
    pub ejected: Vec<HeldObject>,
}

impl FakeActor {
    pub fn new(name: &str, group: Option<&str>, slots: Vec<Option<HeldObject>>) -> Self {
        Self {
            name: name.to_string(),
            group: group.map(str::to_string),
            slots,
            ejected: Vec::new(),
        }
    }

    pub fn held_ids(&self) -> Vec<Option<String>> {
        self.slots
            .iter()
            .map(|s| s.as_ref().map(|h| h.id.to_string()))
            .collect()
    }
}

impl Actor for FakeActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, index: usize) -> Option<HeldObject> {
        self.slots.get(index).cloned().flatten()
    }

    fn clear_slot(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    fn eject(&mut self, object: HeldObject) {
        self.ejected.push(object);
    }
}
