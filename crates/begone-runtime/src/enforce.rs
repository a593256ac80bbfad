//! Enforcement: turns policy verdicts into effects on an actor.
//!
//! Fail-closed rules:
//! - Unknown group on a guarded action: warn and reject.
//! - Unknown group on a passive check: warn and sweep with `global` rules.
//! - Poisoned rule store: reject (guarded) / skip with an error log (passive).

use std::sync::Arc;

use begone_core::error::{BegoneError, Result};
use begone_core::policy::{self, DenyReason, Verdict};
use begone_core::{RuleStore, GLOBAL_GROUP};

use crate::host::{ActionHook, ActionKind, ActionVerdict, Actor, HeldObject};
use crate::obs::RuntimeMetrics;
use crate::store::SharedRules;

/// What a sweep removed.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// First forbidden object found, with the rule that matched.
    pub first: Option<(HeldObject, DenyReason)>,
    pub removed: u64,
}

pub struct EnforcementCoordinator {
    rules: SharedRules,
    metrics: Arc<RuntimeMetrics>,
}

impl EnforcementCoordinator {
    pub fn new(rules: SharedRules) -> Self {
        Self {
            rules,
            metrics: Arc::new(RuntimeMetrics::default()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<RuntimeMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Remove every object `group` may not hold.
    ///
    /// Slots are visited by fixed index, so clearing one never shifts or skips
    /// its neighbours. With `deleteOnDeny` off a copy is ejected before the slot
    /// is cleared.
    pub fn sweep(&self, actor: &mut dyn Actor, group: &str) -> Result<SweepReport> {
        self.rules.read(|store| sweep_with(store, actor, group))?
    }

    fn evaluate(&self, held: &HeldObject, group: &str) -> Result<Verdict> {
        self.rules
            .read(|store| policy::evaluate(store, &held.id, group))?
    }
}

fn sweep_with(store: &RuleStore, actor: &mut dyn Actor, group: &str) -> Result<SweepReport> {
    let delete = store.delete_on_deny();
    let mut report = SweepReport::default();

    let slots = actor.slot_count();
    for i in 0..slots {
        let Some(obj) = actor.slot(i) else { continue };
        if let Verdict::Deny(reason) = policy::evaluate(store, &obj.id, group)? {
            if !delete {
                actor.eject(obj.clone());
            }
            actor.clear_slot(i);
            report.removed += 1;
            if report.first.is_none() {
                report.first = Some((obj, reason));
            }
        }
    }
    Ok(report)
}

/// Actor's declared group, or `global`.
pub fn resolve_group(actor: &dyn Actor) -> String {
    actor.group().unwrap_or(GLOBAL_GROUP).to_string()
}

impl ActionHook for EnforcementCoordinator {
    fn on_held_object_use(
        &self,
        actor: &mut dyn Actor,
        held: &HeldObject,
        action: ActionKind,
    ) -> ActionVerdict {
        let group = resolve_group(actor);

        let reason = match self.evaluate(held, &group) {
            Ok(Verdict::Allow) => return ActionVerdict::Allow,
            Ok(Verdict::Deny(reason)) => reason,
            Err(BegoneError::NoSuchGroup(missing)) => {
                tracing::warn!(
                    actor = %actor.name(),
                    group = %missing,
                    action = action.as_str(),
                    "unable to determine the blacklist, fix your config! action will be failed for safety"
                );
                self.metrics.record_denial(&group, action);
                return ActionVerdict::Reject;
            }
            Err(e) => {
                tracing::error!(actor = %actor.name(), error = %e, "blacklist check failed; rejecting action");
                self.metrics.record_denial(&group, action);
                return ActionVerdict::Reject;
            }
        };

        tracing::info!(
            actor = %actor.name(),
            object = %held.id,
            rule = %reason,
            action = action.as_str(),
            "actor attempted to use blacklisted object"
        );
        self.metrics.record_denial(&group, action);

        match self.sweep(actor, &group) {
            Ok(report) => self.metrics.record_removed(&group, report.removed),
            Err(e) => tracing::error!(actor = %actor.name(), error = %e, "held-object sweep failed"),
        }
        ActionVerdict::Reject
    }

    fn on_held_object_collection_changed(&self, actor: &mut dyn Actor) {
        let group = resolve_group(actor);

        let (swept_group, report) = match self.sweep(actor, &group) {
            Ok(report) => (group, report),
            Err(BegoneError::NoSuchGroup(missing)) => {
                tracing::warn!(
                    actor = %actor.name(),
                    group = %missing,
                    "unable to determine the blacklist, fix your config! falling back to global rules"
                );
                match self.sweep(actor, GLOBAL_GROUP) {
                    Ok(report) => (GLOBAL_GROUP.to_string(), report),
                    Err(e) => {
                        tracing::error!(actor = %actor.name(), error = %e, "global sweep failed");
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::error!(actor = %actor.name(), error = %e, "held-object sweep failed");
                return;
            }
        };

        if let Some((obj, reason)) = &report.first {
            tracing::info!(
                actor = %actor.name(),
                object = %obj.id,
                rule = %reason,
                removed = report.removed,
                "actor picked up blacklisted object"
            );
        }
        self.metrics.record_removed(&swept_group, report.removed);
    }
}
