//! Rule data model: groups, their blacklists, and the process-wide store.
//!
//! The persisted document is strict: every field is required and unknown
//! fields are rejected. A document that parses but breaks an invariant
//! (missing `global`, duplicate group names, malformed rule entries) is
//! reported as `ConfigCorrupt` as well.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{BegoneError, Result};
use crate::object::{is_valid_category, ObjectId};

/// Name of the group whose rules apply to every actor.
pub const GLOBAL_GROUP: &str = "global";

/// A named set of actors sharing one rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Group {
    name: String,
    enabled: bool,
    category_blacklist: BTreeSet<String>,
    item_blacklist: BTreeSet<String>,
}

impl Group {
    /// Empty, enabled group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            category_blacklist: BTreeSet::new(),
            item_blacklist: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_global(&self) -> bool {
        self.name == GLOBAL_GROUP
    }

    pub fn category_blacklist(&self) -> &BTreeSet<String> {
        &self.category_blacklist
    }

    pub fn item_blacklist(&self) -> &BTreeSet<String> {
        &self.item_blacklist
    }

    /// Set the enabled flag. Returns the previous value.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.enabled, enabled)
    }

    /// Builder-style helper, mostly for seeding stores.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category_blacklist.insert(category.into());
        self
    }

    /// Builder-style helper, mostly for seeding stores.
    pub fn with_item(mut self, id: &ObjectId) -> Self {
        self.item_blacklist.insert(id.to_string());
        self
    }

    /// Builder-style helper, mostly for seeding stores.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn add_category(&mut self, category: &str) -> Result<()> {
        if !is_valid_category(category) {
            return Err(BegoneError::InvalidRule(format!(
                "Invalid namespace '{category}'!"
            )));
        }
        if !self.category_blacklist.insert(category.to_string()) {
            return Err(BegoneError::RuleConflict(format!(
                "Group '{}' already has the namespace '{category}' blacklisted!",
                self.name
            )));
        }
        Ok(())
    }

    pub fn remove_category(&mut self, category: &str) -> Result<()> {
        if !self.category_blacklist.remove(category) {
            return Err(BegoneError::RuleConflict(format!(
                "Group '{}' does not have the namespace '{category}' blacklisted!",
                self.name
            )));
        }
        Ok(())
    }

    pub fn add_item(&mut self, id: &ObjectId) -> Result<()> {
        if !self.item_blacklist.insert(id.to_string()) {
            return Err(BegoneError::RuleConflict(format!(
                "Group '{}' already has the item '{id}' blacklisted!",
                self.name
            )));
        }
        Ok(())
    }

    pub fn remove_item(&mut self, id: &ObjectId) -> Result<()> {
        if !self.item_blacklist.remove(&id.to_string()) {
            return Err(BegoneError::RuleConflict(format!(
                "Group '{}' does not have the item '{id}' blacklisted!",
                self.name
            )));
        }
        Ok(())
    }

    fn validate(&self, index: usize) -> Result<()> {
        if !is_valid_group_name(&self.name) {
            return Err(BegoneError::ConfigCorrupt(format!(
                "group #{} has an invalid name '{}'",
                index + 1,
                self.name
            )));
        }
        if let Some(bad) = self.category_blacklist.iter().find(|c| !is_valid_category(c)) {
            return Err(BegoneError::ConfigCorrupt(format!(
                "group '{}' has a malformed namespace rule '{bad}'",
                self.name
            )));
        }
        for item in &self.item_blacklist {
            // Item rules are stored fully qualified; a bare path would never match.
            if !item.contains(':') || ObjectId::parse(item).is_err() {
                return Err(BegoneError::ConfigCorrupt(format!(
                    "group '{}' has a malformed item rule '{item}'",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// All groups plus the process-wide enforcement flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleStore {
    delete_on_deny: bool,
    groups: Vec<Group>,
}

impl Default for RuleStore {
    /// A single empty `global` group, objects ejected rather than destroyed.
    fn default() -> Self {
        Self {
            delete_on_deny: false,
            groups: vec![Group::new(GLOBAL_GROUP)],
        }
    }
}

impl RuleStore {
    /// Build a store from parts, enforcing the same invariants as loading.
    pub fn new(delete_on_deny: bool, groups: Vec<Group>) -> Result<Self> {
        let store = Self {
            delete_on_deny,
            groups,
        };
        store.validate()?;
        Ok(store)
    }

    /// Strict parse of the persisted JSON document.
    pub fn from_json(s: &str) -> Result<Self> {
        let store: RuleStore = serde_json::from_str(s)
            .map_err(|e| BegoneError::ConfigCorrupt(format!("invalid rules document: {e}")))?;
        store.validate()?;
        tracing::debug!(groups = store.groups.len(), "rules document parsed");
        Ok(store)
    }

    /// Pretty-printed persisted form.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BegoneError::Internal(format!("serialize rules failed: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.groups.len());
        for (i, g) in self.groups.iter().enumerate() {
            g.validate(i)?;
            if !seen.insert(g.name.as_str()) {
                return Err(BegoneError::ConfigCorrupt(format!(
                    "group '{}' is declared more than once",
                    g.name
                )));
            }
        }
        if !seen.contains(GLOBAL_GROUP) {
            return Err(BegoneError::ConfigCorrupt(format!(
                "required group '{GLOBAL_GROUP}' is not present"
            )));
        }
        Ok(())
    }

    pub fn delete_on_deny(&self) -> bool {
        self.delete_on_deny
    }

    /// Returns the previous value.
    pub fn set_delete_on_deny(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.delete_on_deny, value)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Result<&Group> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| BegoneError::NoSuchGroup(name.to_string()))
    }

    pub fn group_mut(&mut self, name: &str) -> Result<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| BegoneError::NoSuchGroup(name.to_string()))
    }

    /// The `global` group. Its presence is a load-time invariant.
    pub fn global(&self) -> Result<&Group> {
        self.group(GLOBAL_GROUP)
    }

    /// Append an empty, enabled group.
    pub fn create_group(&mut self, name: &str) -> Result<()> {
        if !is_valid_group_name(name) {
            return Err(BegoneError::InvalidRule(format!(
                "Invalid group name '{name}'!"
            )));
        }
        if self.groups.iter().any(|g| g.name == name) {
            return Err(BegoneError::RuleConflict(format!(
                "Group '{name}' already exists!"
            )));
        }
        self.groups.push(Group::new(name));
        Ok(())
    }

    /// Remove a group. `global` can never be removed.
    pub fn remove_group(&mut self, name: &str) -> Result<Group> {
        if name == GLOBAL_GROUP {
            return Err(BegoneError::RuleConflict(format!(
                "Group '{GLOBAL_GROUP}' can not be removed!"
            )));
        }
        let idx = self
            .groups
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| BegoneError::NoSuchGroup(name.to_string()))?;
        Ok(self.groups.remove(idx))
    }
}

fn is_valid_group_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}
