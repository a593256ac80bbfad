//! Blacklist command catalog tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use begone_core::policy::is_forbidden;
use begone_core::ObjectId;
use begone_runtime::catalog;
use begone_runtime::command::{CommandDispatcher, CommandOutcome};
use begone_runtime::context::OperatorSource;
use begone_runtime::enforce::EnforcementCoordinator;
use begone_runtime::host::{ActionHook, ObjectRegistry, StaticRegistry};
use begone_runtime::store::{MemoryPersistence, SharedRules};

mod support;
use support::{held, id, operator, red_store, registry, shared, FakeActor};

struct Fixture {
    dispatcher: CommandDispatcher<OperatorSource>,
    rules: SharedRules,
    persistence: Arc<MemoryPersistence>,
    op: OperatorSource,
}

impl Fixture {
    fn new() -> Self {
        let (rules, persistence) = shared(red_store(false));
        let dispatcher = CommandDispatcher::new();
        catalog::register(&dispatcher, rules.clone(), registry()).unwrap();
        Self {
            dispatcher,
            rules,
            persistence,
            op: operator(2),
        }
    }

    fn run(&self, input: &str) -> CommandOutcome {
        self.dispatcher.execute(&self.op, input)
    }

    fn forbidden(&self, obj: &str, group: &str) -> bool {
        self.rules
            .read(|s| is_forbidden(s, &id(obj), group))
            .unwrap()
            .unwrap()
    }
}

#[test]
fn hello_is_open_to_everyone() {
    let f = Fixture::new();
    let out = f.dispatcher.execute(&operator(0), "ibg debug testing hello");
    assert_eq!(out, CommandOutcome::Success("Hello, world! IBG is online!".into()));
}

#[test]
fn edits_require_level_two() {
    let f = Fixture::new();
    let out = f.dispatcher.execute(&operator(1), "ibg namespace add red create");
    assert_eq!(out.status(), "rejected");
    assert_eq!(f.persistence.writes(), 0);
    assert!(!f.forbidden("create:cogwheel", "red"));
}

#[test]
fn get_reports_the_group_rules() {
    let f = Fixture::new();
    let out = f.run("ibg blacklist get red");
    assert_eq!(
        out,
        CommandOutcome::Success("// red (enabled):\n\nnamespaces:\n[wood]\nitems:\n[]".into())
    );
    assert_eq!(f.persistence.writes(), 0);
}

#[test]
fn get_unknown_group_is_rejected_without_writing() {
    let f = Fixture::new();
    let before = f.rules.snapshot().unwrap();

    let out = f.run("ibg blacklist get nonexistent");
    assert_eq!(out, CommandOutcome::Rejected("No such group 'nonexistent'!".into()));
    assert_eq!(f.persistence.writes(), 0);
    assert_eq!(f.rules.snapshot().unwrap(), before);
}

#[test]
fn set_enabled_false_lifts_group_rules() {
    let f = Fixture::new();
    assert!(f.forbidden("wood:plank", "red"));

    let out = f.run("ibg blacklist set_enabled red false");
    assert_eq!(
        out,
        CommandOutcome::Success("Switched group 'red' enabled state to: false!".into())
    );
    assert!(!f.forbidden("wood:plank", "red"));
    assert_eq!(f.persistence.writes(), 1);

    // No-op toggle is rejected and not persisted.
    let out = f.run("ibg blacklist set_enabled red false");
    assert_eq!(out, CommandOutcome::Rejected("Group 'red' is already disabled!".into()));
    assert_eq!(f.persistence.writes(), 1);
}

#[test]
fn namespace_add_and_del_round_trip() {
    let f = Fixture::new();

    let out = f.run("ibg namespace add red create");
    assert!(out.is_success(), "{out:?}");
    assert!(f.forbidden("create:cogwheel", "red"));

    let out = f.run("ibg namespace add red create");
    assert_eq!(
        out,
        CommandOutcome::Rejected("Group 'red' already has the namespace 'create' blacklisted!".into())
    );

    let out = f.run("ibg namespace del red create");
    assert!(out.is_success(), "{out:?}");
    assert!(!f.forbidden("create:cogwheel", "red"));

    let out = f.run("ibg namespace del red create");
    assert_eq!(
        out,
        CommandOutcome::Rejected("Group 'red' does not have the namespace 'create' blacklisted!".into())
    );
    assert_eq!(f.persistence.writes(), 2);

    let persisted = f.persistence.document().unwrap();
    assert!(persisted.contains("\"wood\""));
    assert!(!persisted.contains("\"create\""));
}

#[test]
fn namespace_must_be_known_to_the_registry() {
    let f = Fixture::new();
    let out = f.run("ibg namespace add red made_up");
    assert_eq!(out, CommandOutcome::Rejected("No such namespace 'made_up'!".into()));

    let out = f.run("ibg namespace add green wood");
    assert_eq!(out, CommandOutcome::Rejected("No such group 'green'!".into()));
    assert_eq!(f.persistence.writes(), 0);
}

#[test]
fn item_add_and_del_round_trip() {
    let f = Fixture::new();

    let out = f.run("ibg item add red minecraft:diamond_sword");
    assert_eq!(
        out,
        CommandOutcome::Success("Added the item 'minecraft:diamond_sword' to 'red's blacklist!".into())
    );
    assert!(f.forbidden("minecraft:diamond_sword", "red"));

    // Bare ids resolve to the default namespace.
    let out = f.run("ibg item add red diamond_sword");
    assert_eq!(out.status(), "rejected");
    let red = f.rules.read(|s| s.group("red").unwrap().item_blacklist().len()).unwrap();
    assert_eq!(red, 1);

    let out = f.run("ibg item del red minecraft:diamond_sword");
    assert!(out.is_success(), "{out:?}");
    assert!(!f.forbidden("minecraft:diamond_sword", "red"));

    let out = f.run("ibg item del red minecraft:diamond_sword");
    assert_eq!(
        out,
        CommandOutcome::Rejected("Group 'red' does not have the item 'minecraft:diamond_sword' blacklisted!".into())
    );
    assert_eq!(f.persistence.writes(), 2);
}

#[test]
fn item_validation_rejects_unknown_and_malformed_ids() {
    let f = Fixture::new();

    let out = f.run("ibg item add red minecraft:unobtainium");
    assert_eq!(out, CommandOutcome::Rejected("No such item 'minecraft:unobtainium'!".into()));

    let out = f.run("ibg item add green minecraft:unobtainium");
    assert_eq!(out, CommandOutcome::Rejected("No such group 'green'!".into()));

    let out = f.run("ibg item add red Not:Valid");
    assert_eq!(out.status(), "rejected");
    assert_eq!(f.persistence.writes(), 0);
}

#[test]
fn delete_on_deny_toggle_persists() {
    let f = Fixture::new();
    assert!(f.run("ibg blacklist delete_on_deny true").is_success());
    assert!(f.rules.read(|s| s.delete_on_deny()).unwrap());
    assert_eq!(f.run("ibg blacklist delete_on_deny true").status(), "rejected");
    assert_eq!(f.persistence.writes(), 1);
}

#[test]
fn group_lifecycle_needs_admin_level() {
    let f = Fixture::new();
    assert_eq!(f.run("ibg group create green").status(), "rejected");

    let admin = operator(3);
    let out = f.dispatcher.execute(&admin, "ibg group create green");
    assert_eq!(out, CommandOutcome::Success("Created group 'green'!".into()));
    assert!(f.run("ibg namespace add green wood").is_success());
    assert!(f.forbidden("wood:log", "green"));

    let out = f.dispatcher.execute(&admin, "ibg group remove global");
    assert_eq!(out, CommandOutcome::Rejected("Group 'global' can not be removed!".into()));

    assert!(f.dispatcher.execute(&admin, "ibg group remove green").is_success());
    assert!(f.rules.read(|s| s.group("green").is_err()).unwrap());
}

#[test]
fn failed_write_reports_failure_and_keeps_memory_unchanged() {
    let f = Fixture::new();
    f.persistence.set_fail_writes(true);

    let out = f.run("ibg namespace add red create");
    assert_eq!(out.status(), "failed");
    assert!(!out.message().contains("write refused"));
    assert!(!f.forbidden("create:cogwheel", "red"));
}

#[test]
fn completions_offer_groups_and_namespaces() {
    let f = Fixture::new();
    assert_eq!(
        f.dispatcher.suggest(&f.op, "ibg namespace add "),
        vec!["blue".to_string(), "global".to_string(), "red".to_string()]
    );
    assert_eq!(
        f.dispatcher.suggest(&f.op, "ibg namespace add red "),
        vec!["create".to_string(), "minecraft".to_string(), "wood".to_string()]
    );
    assert_eq!(
        f.dispatcher.suggest(&f.op, "ibg blacklist set_enabled red "),
        vec!["false".to_string(), "true".to_string()]
    );
    assert_eq!(
        f.dispatcher.suggest(&f.op, "ibg "),
        vec![
            "blacklist".to_string(),
            "debug".to_string(),
            "group".to_string(),
            "item".to_string(),
            "namespace".to_string()
        ]
    );
}

/// Registry whose category listing panics on its first call.
struct FlakyRegistry {
    inner: Arc<StaticRegistry>,
    tripped: AtomicBool,
}

impl ObjectRegistry for FlakyRegistry {
    fn categories(&self) -> Vec<String> {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            panic!("registry unavailable");
        }
        self.inner.categories()
    }

    fn contains(&self, id: &ObjectId) -> bool {
        self.inner.contains(id)
    }

    fn group_names(&self) -> Vec<String> {
        self.inner.group_names()
    }
}

#[test]
fn panicking_registry_fails_one_command_only() {
    let (rules, persistence) = shared(red_store(false));
    let dispatcher = CommandDispatcher::new();
    let flaky = Arc::new(FlakyRegistry {
        inner: registry(),
        tripped: AtomicBool::new(false),
    });
    catalog::register(&dispatcher, rules.clone(), flaky).unwrap();
    let op = operator(2);

    let out = dispatcher.execute(&op, "ibg namespace add red create");
    assert_eq!(out.status(), "failed");
    assert_eq!(persistence.writes(), 0);

    assert!(dispatcher.execute(&op, "ibg blacklist get red").is_success());
    assert!(dispatcher.execute(&op, "ibg namespace add red create").is_success());
    assert_eq!(persistence.writes(), 1);

    let coord = EnforcementCoordinator::new(rules);
    let mut alice = FakeActor::new("alice", Some("red"), vec![Some(held("create:cogwheel", 1))]);
    coord.on_held_object_collection_changed(&mut alice);
    assert_eq!(alice.held_ids(), vec![None]);
}
