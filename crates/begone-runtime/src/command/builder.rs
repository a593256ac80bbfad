//! Declaration -> command tree compiler.
//!
//! A declaration is flat: `name`, a `/`-separated `path`, a permission level,
//! ordered arguments and a handler. `build` turns it into
//!
//! ```text
//! path[0] -> path[1] -> ... -> name (guarded) -> arg[0] -> ... -> arg[n] (executes)
//! ```
//!
//! A path that is blank or starts with `name` registers `name` as a root.

use std::sync::Arc;

use begone_core::error::Result;

use super::args::{ArgumentSpec, CommandContext};
use super::node::{CommandNode, Handler};

/// Path separator for nested commands (`ibg/namespace`).
pub const PATH_SEPARATOR: char = '/';

/// Flat command declaration.
pub struct CommandSpec<S> {
    pub name: String,
    pub path: String,
    pub level: u8,
    pub arguments: Vec<ArgumentSpec<S>>,
    pub handler: Handler<S>,
}

impl<S> CommandSpec<S> {
    pub fn new<F>(name: impl Into<String>, path: impl Into<String>, level: u8, handler: F) -> Self
    where
        F: Fn(&CommandContext<'_, S>) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            path: path.into(),
            level,
            arguments: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn arg(mut self, arg: ArgumentSpec<S>) -> Self {
        self.arguments.push(arg);
        self
    }
}

/// Compile one declaration into its root node.
pub fn build<S>(spec: CommandSpec<S>) -> CommandNode<S> {
    let CommandSpec {
        name,
        path,
        level,
        arguments,
        handler,
    } = spec;

    let leaf = CommandNode::literal(name.as_str()).requires(level);
    let leaf = match chain_arguments(arguments, &handler) {
        Some(chain) => leaf.then(chain),
        None => leaf.executes(handler),
    };

    let segments = split_path(&path);
    match segments.first() {
        None => leaf,
        Some(first) if *first == name => leaf,
        Some(_) => segments
            .iter()
            .rev()
            .fold(leaf, |inner, seg| CommandNode::literal(*seg).then(inner)),
    }
}

/// Fold arguments bottom-up into a single chain; the deepest one executes.
fn chain_arguments<S>(arguments: Vec<ArgumentSpec<S>>, handler: &Handler<S>) -> Option<CommandNode<S>> {
    arguments.into_iter().rev().fold(None, |tail, arg| {
        let node = CommandNode::argument(arg);
        Some(match tail {
            Some(child) => node.then(child),
            None => node.executes(Arc::clone(handler)),
        })
    })
}

/// Split a `/`-separated path, dropping blank segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
