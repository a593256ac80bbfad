//! Operator commands for editing the blacklist.
//!
//! Every mutating command goes through `SharedRules::mutate`, so a rejected
//! command (unknown group, invalid rule, no-op) never reaches persistence and
//! a confirmation is only returned after the write succeeded.

use std::sync::Arc;

use begone_core::error::{BegoneError, Result};
use begone_core::object::is_valid_category;
use begone_core::{Group, GLOBAL_GROUP};

use crate::command::{ArgumentSpec, CommandContext, CommandDispatcher, CommandSource, CommandSpec};
use crate::host::ObjectRegistry;
use crate::store::SharedRules;

/// Root literal of every catalog command.
pub const ROOT: &str = "ibg";

/// Level required for blacklist edits.
pub const EDIT_LEVEL: u8 = 2;
/// Level required to create or remove groups.
pub const ADMIN_LEVEL: u8 = 3;

/// Register every blacklist command on `dispatcher`.
pub fn register<S>(
    dispatcher: &CommandDispatcher<S>,
    rules: SharedRules,
    registry: Arc<dyn ObjectRegistry>,
) -> Result<()>
where
    S: CommandSource + 'static,
{
    let cat = Catalog { rules, registry };

    dispatcher.register_spec(CommandSpec::new(
        "hello",
        "ibg/debug/testing",
        0,
        |_ctx: &CommandContext<'_, S>| Ok("Hello, world! IBG is online!".to_string()),
    ))?;

    let c = cat.clone();
    dispatcher.register_spec(
        CommandSpec::new("get", "ibg/blacklist", EDIT_LEVEL, move |ctx: &CommandContext<'_, S>| {
            c.get(ctx.word("group")?)
        })
        .arg(cat.group_arg()),
    )?;

    let c = cat.clone();
    dispatcher.register_spec(
        CommandSpec::new("set_enabled", "ibg/blacklist", EDIT_LEVEL, move |ctx: &CommandContext<'_, S>| {
            audit(ctx, c.set_enabled(ctx.word("group")?, ctx.boolean("enabled")?))
        })
        .arg(cat.group_arg())
        .arg(ArgumentSpec::boolean("enabled")),
    )?;

    let c = cat.clone();
    dispatcher.register_spec(
        CommandSpec::new("delete_on_deny", "ibg/blacklist", EDIT_LEVEL, move |ctx: &CommandContext<'_, S>| {
            audit(ctx, c.set_delete_on_deny(ctx.boolean("enabled")?))
        })
        .arg(ArgumentSpec::boolean("enabled")),
    )?;

    let c = cat.clone();
    dispatcher.register_spec(
        CommandSpec::new("add", "ibg/namespace", EDIT_LEVEL, move |ctx: &CommandContext<'_, S>| {
            audit(ctx, c.add_namespace(ctx.word("group")?, ctx.word("namespace")?))
        })
        .arg(cat.group_arg())
        .arg(cat.namespace_arg()),
    )?;

    let c = cat.clone();
    dispatcher.register_spec(
        CommandSpec::new("del", "ibg/namespace", EDIT_LEVEL, move |ctx: &CommandContext<'_, S>| {
            audit(ctx, c.del_namespace(ctx.word("group")?, ctx.word("namespace")?))
        })
        .arg(cat.group_arg())
        .arg(cat.namespace_arg()),
    )?;

    let c = cat.clone();
    dispatcher.register_spec(
        CommandSpec::new("add", "ibg/item", EDIT_LEVEL, move |ctx: &CommandContext<'_, S>| {
            let id = ctx.object("item")?;
            let group = ctx.word("group")?;
            if !c.registry.contains(id) {
                // Resolve the group first so an unknown group wins over an unknown item.
                c.rules.read(|store| store.group(group).map(|_| ()))??;
                return Err(BegoneError::InvalidRule(format!("No such item '{id}'!")));
            }
            c.rules.mutate(|store| store.group_mut(group)?.add_item(id))?;
            audit(ctx, Ok(format!("Added the item '{id}' to '{group}'s blacklist!")))
        })
        .arg(cat.group_arg())
        .arg(ArgumentSpec::object("item")),
    )?;

    let c = cat.clone();
    dispatcher.register_spec(
        CommandSpec::new("del", "ibg/item", EDIT_LEVEL, move |ctx: &CommandContext<'_, S>| {
            let id = ctx.object("item")?;
            let group = ctx.word("group")?;
            c.rules.mutate(|store| store.group_mut(group)?.remove_item(id))?;
            audit(ctx, Ok(format!("Removed the item '{id}' from '{group}'s blacklist!")))
        })
        .arg(cat.group_arg())
        .arg(ArgumentSpec::object("item")),
    )?;

    let c = cat.clone();
    dispatcher.register_spec(
        CommandSpec::new("create", "ibg/group", ADMIN_LEVEL, move |ctx: &CommandContext<'_, S>| {
            let name = ctx.word("group")?;
            c.rules.mutate(|store| store.create_group(name))?;
            audit(ctx, Ok(format!("Created group '{name}'!")))
        })
        .arg(ArgumentSpec::word("group")),
    )?;

    let c = cat.clone();
    dispatcher.register_spec(
        CommandSpec::new("remove", "ibg/group", ADMIN_LEVEL, move |ctx: &CommandContext<'_, S>| {
            let name = ctx.word("group")?;
            c.rules.mutate(|store| store.remove_group(name))?;
            audit(ctx, Ok(format!("Removed group '{name}'!")))
        })
        .arg(cat.group_arg()),
    )?;

    Ok(())
}

#[derive(Clone)]
struct Catalog {
    rules: SharedRules,
    registry: Arc<dyn ObjectRegistry>,
}

impl Catalog {
    /// `<group>` argument offering `global`, host groups and configured groups.
    fn group_arg<S>(&self) -> ArgumentSpec<S> {
        let rules = self.rules.clone();
        let registry = Arc::clone(&self.registry);
        ArgumentSpec::word("group").suggests(move |_src: &S, _partial: &str| {
            let mut names = vec![GLOBAL_GROUP.to_string()];
            names.extend(registry.group_names());
            if let Ok(configured) = rules.read(|s| {
                s.groups().iter().map(|g| g.name().to_string()).collect::<Vec<_>>()
            }) {
                names.extend(configured);
            }
            names
        })
    }

    /// `<namespace>` argument offering every category the host knows.
    fn namespace_arg<S>(&self) -> ArgumentSpec<S> {
        let registry = Arc::clone(&self.registry);
        ArgumentSpec::word("namespace").suggests(move |_src: &S, _partial: &str| registry.categories())
    }

    fn get(&self, group: &str) -> Result<String> {
        self.rules.read(|store| store.group(group).map(describe))?
    }

    fn set_enabled(&self, group: &str, enabled: bool) -> Result<String> {
        self.rules.mutate(|store| {
            let g = store.group_mut(group)?;
            if g.enabled() == enabled {
                return Err(BegoneError::RuleConflict(format!(
                    "Group '{group}' is already {}!",
                    enabled_word(enabled)
                )));
            }
            g.set_enabled(enabled);
            Ok(())
        })?;
        Ok(format!("Switched group '{group}' enabled state to: {enabled}!"))
    }

    fn set_delete_on_deny(&self, value: bool) -> Result<String> {
        self.rules.mutate(|store| {
            if store.delete_on_deny() == value {
                return Err(BegoneError::RuleConflict(format!(
                    "delete_on_deny is already {value}!"
                )));
            }
            store.set_delete_on_deny(value);
            Ok(())
        })?;
        Ok(format!("Switched delete_on_deny to: {value}!"))
    }

    fn add_namespace(&self, group: &str, namespace: &str) -> Result<String> {
        // Host registry is consulted before the write lock is taken.
        let known = self.registry.categories().iter().any(|c| c == namespace);
        self.rules.mutate(|store| {
            let g = store.group_mut(group)?;
            if !known {
                return Err(BegoneError::InvalidRule(format!(
                    "No such namespace '{namespace}'!"
                )));
            }
            g.add_category(namespace)
        })?;
        Ok(format!("Added the namespace '{namespace}' to '{group}'s blacklist!"))
    }

    // Removal only checks syntax: a namespace whose objects left the registry
    // must still be removable.
    fn del_namespace(&self, group: &str, namespace: &str) -> Result<String> {
        self.rules.mutate(|store| {
            let g = store.group_mut(group)?;
            if !is_valid_category(namespace) {
                return Err(BegoneError::InvalidRule(format!(
                    "No such namespace '{namespace}'!"
                )));
            }
            g.remove_category(namespace)
        })?;
        Ok(format!("Removed the namespace '{namespace}' from '{group}'s blacklist!"))
    }
}

/// Log a successful edit with the source that made it.
fn audit<S: CommandSource>(ctx: &CommandContext<'_, S>, res: Result<String>) -> Result<String> {
    if let Ok(msg) = &res {
        tracing::info!(source = %ctx.source().name(), change = %msg, "blacklist edited");
    }
    res
}

fn enabled_word(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

fn describe(g: &Group) -> String {
    let list = |set: &std::collections::BTreeSet<String>| {
        format!("[{}]", set.iter().cloned().collect::<Vec<_>>().join(", "))
    };
    format!(
        "// {} ({}):\n\nnamespaces:\n{}\nitems:\n{}",
        g.name(),
        enabled_word(g.enabled()),
        list(g.category_blacklist()),
        list(g.item_blacklist())
    )
}
