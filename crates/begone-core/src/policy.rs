//! Blacklist evaluation.
//!
//! An object is forbidden for a group when:
//! - the group is enabled and one of its category/item rules matches, or
//! - one of `global`'s rules matches (regardless of any `enabled` flag).
//!
//! Evaluation is read-only and deterministic for a given store snapshot.

use std::fmt;

use crate::error::Result;
use crate::object::ObjectId;
use crate::rules::{Group, RuleStore, GLOBAL_GROUP};

/// Which rule kind matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedRule {
    Category(String),
    Item(String),
}

/// Why an object was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyReason {
    /// Group that owns the matching rule (`global` or the actor's group).
    pub group: String,
    pub rule: MatchedRule,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            MatchedRule::Category(c) => write!(f, "{}: namespace {c}", self.group),
            MatchedRule::Item(i) => write!(f, "{}: item {i}", self.group),
        }
    }
}

/// Decision from policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(DenyReason),
}

impl Verdict {
    pub fn is_deny(&self) -> bool {
        matches!(self, Verdict::Deny(_))
    }
}

/// Evaluate `object` for an actor in `group`.
///
/// Fails with `NoSuchGroup` when `group` (or `global`) is missing; callers
/// pick the fail-safe behavior.
pub fn evaluate(store: &RuleStore, object: &ObjectId, group: &str) -> Result<Verdict> {
    let own = store.group(group)?;
    let global = store.group(GLOBAL_GROUP)?;

    if own.enabled() && !own.is_global() {
        if let Some(rule) = matching_rule(own, object) {
            return Ok(deny(own, rule));
        }
    }

    Ok(match matching_rule(global, object) {
        Some(rule) => deny(global, rule),
        None => Verdict::Allow,
    })
}

/// Boolean form of [`evaluate`].
pub fn is_forbidden(store: &RuleStore, object: &ObjectId, group: &str) -> Result<bool> {
    evaluate(store, object, group).map(|v| v.is_deny())
}

/// Evaluate against `global` alone. Used when the actor's group is unknown.
pub fn evaluate_global(store: &RuleStore, object: &ObjectId) -> Result<Verdict> {
    evaluate(store, object, GLOBAL_GROUP)
}

fn matching_rule(group: &Group, object: &ObjectId) -> Option<MatchedRule> {
    if group.category_blacklist().contains(object.category()) {
        return Some(MatchedRule::Category(object.category().to_string()));
    }
    let fqid = object.to_string();
    if group.item_blacklist().contains(&fqid) {
        return Some(MatchedRule::Item(fqid));
    }
    None
}

fn deny(group: &Group, rule: MatchedRule) -> Verdict {
    Verdict::Deny(DenyReason {
        group: group.name().to_string(),
        rule,
    })
}
