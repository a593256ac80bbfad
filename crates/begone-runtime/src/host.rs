//! Host-side capabilities the runtime depends on.
//!
//! The host application owns actors, their held objects and its object
//! registry; it exposes them through these traits and owns invocation of the
//! `ActionHook` callbacks.

use std::collections::BTreeSet;

use begone_core::ObjectId;

/// One occupied held-object slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldObject {
    pub id: ObjectId,
    pub count: u32,
}

impl HeldObject {
    pub fn new(id: ObjectId, count: u32) -> Self {
        Self { id, count }
    }
}

/// An actor (player) with a fixed-size held-object collection.
pub trait Actor {
    fn name(&self) -> &str;
    /// Declared group, `None` when the actor is in no group.
    fn group(&self) -> Option<&str>;
    fn slot_count(&self) -> usize;
    /// Copy of the object in `index`, `None` for an empty slot.
    fn slot(&self, index: usize) -> Option<HeldObject>;
    fn clear_slot(&mut self, index: usize);
    /// Drop `object` into the environment around the actor.
    fn eject(&mut self, object: HeldObject);
}

/// Which host action triggered a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    UseItem,
    UseBlock,
    AttackBlock,
    UseEntity,
    AttackEntity,
    SlotPickUp,
    SlotPutDown,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::UseItem => "use_item",
            ActionKind::UseBlock => "use_block",
            ActionKind::AttackBlock => "attack_block",
            ActionKind::UseEntity => "use_entity",
            ActionKind::AttackEntity => "attack_entity",
            ActionKind::SlotPickUp => "slot_pick_up",
            ActionKind::SlotPutDown => "slot_put_down",
        }
    }
}

/// Answer to the host for a guarded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionVerdict {
    Allow,
    Reject,
}

/// Callbacks the host invokes synchronously.
pub trait ActionHook {
    /// An actor is about to use/place/attack with/move `held`.
    fn on_held_object_use(
        &self,
        actor: &mut dyn Actor,
        held: &HeldObject,
        action: ActionKind,
    ) -> ActionVerdict;

    /// Something entered the actor's collection outside a guarded action.
    fn on_held_object_collection_changed(&self, actor: &mut dyn Actor);
}

/// The host's live object registry.
pub trait ObjectRegistry: Send + Sync {
    /// Distinct category prefixes of every known object.
    fn categories(&self) -> Vec<String>;
    fn contains(&self, id: &ObjectId) -> bool;
    /// Host-side group names (offered as completions next to `global`).
    fn group_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Fixed registry, built from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    objects: BTreeSet<ObjectId>,
    groups: Vec<String>,
}

impl StaticRegistry {
    pub fn new(objects: impl IntoIterator<Item = ObjectId>) -> Self {
        Self {
            objects: objects.into_iter().collect(),
            groups: Vec::new(),
        }
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = String>) -> Self {
        self.groups = groups.into_iter().collect();
        self
    }
}

impl ObjectRegistry for StaticRegistry {
    fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.objects.iter().map(ObjectId::category).collect();
        set.into_iter().map(str::to_string).collect()
    }

    fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains(id)
    }

    fn group_names(&self) -> Vec<String> {
        self.groups.clone()
    }
}
