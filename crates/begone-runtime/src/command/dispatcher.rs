use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use begone_core::error::{BegoneError, Result};

use super::args::{ArgValue, CommandContext};
use super::builder::{build, CommandSpec};
use super::node::{CommandNode, CommandSource, Handler, NodeKind};

/// Shown to operators when a handler fails unexpectedly. Details stay in the log.
pub const FAILURE_MESSAGE: &str =
    "= [IBG ERROR] =\nSomething went wrong while running that command.\nInform your server admin!\n===";

/// Result of running one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Handler succeeded; carries the confirmation.
    Success(String),
    /// Input or state rejected the command; carries the reason.
    Rejected(String),
    /// Handler fault; carries an opaque message.
    Failed(String),
}

impl CommandOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            CommandOutcome::Success(_) => "success",
            CommandOutcome::Rejected(_) => "rejected",
            CommandOutcome::Failed(_) => "failed",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CommandOutcome::Success(m) | CommandOutcome::Rejected(m) | CommandOutcome::Failed(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success(_))
    }
}

/// Registry of command trees keyed by root literal.
pub struct CommandDispatcher<S> {
    roots: DashMap<String, CommandNode<S>>,
}

impl<S> Default for CommandDispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CommandDispatcher<S> {
    pub fn new() -> Self {
        Self {
            roots: DashMap::new(),
        }
    }

    /// Register a root node, merging with an existing root of the same name.
    pub fn register(&self, node: CommandNode<S>) -> Result<()> {
        if !node.is_literal() {
            return Err(BegoneError::DuplicateCommand(format!(
                "root node '{}' must be a literal",
                node.name()
            )));
        }
        match self.roots.entry(node.name().to_string()) {
            Entry::Occupied(mut e) => e.get_mut().merge(node),
            Entry::Vacant(e) => {
                e.insert(node);
                Ok(())
            }
        }
    }

    /// Build a declaration and register it.
    pub fn register_spec(&self, spec: CommandSpec<S>) -> Result<()> {
        self.register(build(spec))
    }

    pub fn root_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.roots.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl<S: CommandSource> CommandDispatcher<S> {
    /// Parse and run one command line.
    ///
    /// Recoverable errors become `Rejected` with their message; anything else
    /// (including a panic inside the handler) is logged and becomes `Failed`.
    pub fn execute(&self, source: &S, input: &str) -> CommandOutcome {
        let line = normalize(input);
        let (handler, args) = match self.parse(source, line) {
            Ok(parsed) => parsed,
            Err(e) => return CommandOutcome::Rejected(e.to_string()),
        };

        let ctx = CommandContext::new(source, args);
        let res = catch_unwind(AssertUnwindSafe(|| handler(&ctx)));

        match res {
            Ok(Ok(msg)) => {
                tracing::debug!(source = %source.name(), input = %line, "command executed");
                CommandOutcome::Success(msg)
            }
            Ok(Err(e)) if e.is_recoverable() => {
                tracing::debug!(source = %source.name(), input = %line, code = e.code().as_str(), "command rejected");
                CommandOutcome::Rejected(e.to_string())
            }
            Ok(Err(e)) => {
                let fault = BegoneError::HandlerFault(e.to_string());
                tracing::error!(source = %source.name(), input = %line, error = %fault, "[COMMAND EXECUTION FAILURE]");
                CommandOutcome::Failed(FAILURE_MESSAGE.to_string())
            }
            Err(panic) => {
                let fault = BegoneError::HandlerFault(panic_message(panic.as_ref()));
                tracing::error!(source = %source.name(), input = %line, error = %fault, "[COMMAND EXECUTION FAILURE] handler panicked");
                CommandOutcome::Failed(FAILURE_MESSAGE.to_string())
            }
        }
    }

    /// Completion candidates for the token currently being typed.
    pub fn suggest(&self, source: &S, input: &str) -> Vec<String> {
        let line = normalize(input);
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        let partial = if line.is_empty() || line.ends_with(char::is_whitespace) {
            ""
        } else {
            tokens.pop().unwrap_or("")
        };

        let level = source.permission_level();
        let mut out: Vec<String> = match tokens.split_first() {
            None => self
                .roots
                .iter()
                .filter(|r| r.value().can_use(level) && r.key().starts_with(partial))
                .map(|r| r.key().clone())
                .collect(),
            Some((root, rest)) => {
                let Some(root) = self.roots.get(*root) else { return Vec::new() };
                if !root.can_use(level) {
                    return Vec::new();
                }
                let mut node = root.value();
                for tok in rest {
                    match descend(node, tok, level) {
                        Ok((next, _)) => node = next,
                        Err(_) => return Vec::new(),
                    }
                }
                child_suggestions(node, source, partial)
            }
        };

        out.sort();
        out.dedup();
        out
    }

    /// Every executable path visible to `source`, e.g. `ibg item add <group> <item>`.
    pub fn usage(&self, source: &S) -> Vec<String> {
        let level = source.permission_level();
        let mut out = Vec::new();
        for root in self.roots.iter() {
            collect_usage(root.value(), level, String::new(), &mut out);
        }
        out.sort();
        out
    }

    fn parse(&self, source: &S, line: &str) -> Result<(Handler<S>, HashMap<String, ArgValue>)> {
        let level = source.permission_level();
        let mut tokens = line.split_whitespace();
        let unknown = || BegoneError::UnknownCommand(format!("Unknown command: '{line}'"));

        let first = tokens.next().ok_or_else(unknown)?;
        let root = self.roots.get(first).ok_or_else(unknown)?;
        if !root.can_use(level) {
            return Err(unknown());
        }

        let mut args = HashMap::new();
        let mut node = root.value();
        for tok in tokens {
            let (next, arg) = descend(node, tok, level)?;
            if let Some((name, value)) = arg {
                args.insert(name, value);
            }
            node = next;
        }

        let handler = node.executor().cloned().ok_or_else(|| {
            BegoneError::UnknownCommand(format!("Incomplete command: '{line}'"))
        })?;
        Ok((handler, args))
    }
}

type Step<'n, S> = (&'n CommandNode<S>, Option<(String, ArgValue)>);

/// Move one token down the tree. Literals win over arguments.
fn descend<'n, S>(node: &'n CommandNode<S>, token: &str, level: u8) -> Result<Step<'n, S>> {
    if let Some(lit) = visible(node, level).find(|c| matches!(c.kind(), NodeKind::Literal(l) if l == token)) {
        return Ok((lit, None));
    }

    let mut first_err = None;
    for child in visible(node, level) {
        if let NodeKind::Argument { name, kind, .. } = child.kind() {
            match kind.parse(token) {
                Ok(value) => return Ok((child, Some((name.clone(), value)))),
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }
    }

    Err(first_err.unwrap_or_else(|| {
        BegoneError::UnknownCommand(format!("Unknown command argument: '{token}'"))
    }))
}

fn visible<S>(node: &CommandNode<S>, level: u8) -> impl Iterator<Item = &CommandNode<S>> {
    node.children().iter().filter(move |c| c.can_use(level))
}

fn child_suggestions<S>(node: &CommandNode<S>, source: &S, partial: &str) -> Vec<String>
where
    S: CommandSource,
{
    let level = source.permission_level();
    let mut out = Vec::new();
    for child in visible(node, level) {
        match child.kind() {
            NodeKind::Literal(l) => out.push(l.clone()),
            NodeKind::Argument { kind, suggest, .. } => match suggest {
                Some(provider) => out.extend(provider(source, partial)),
                None => out.extend(kind.builtin_suggestions().iter().map(|s| s.to_string())),
            },
        }
    }
    out.retain(|s| s.starts_with(partial));
    out
}

fn collect_usage<S>(node: &CommandNode<S>, level: u8, prefix: String, out: &mut Vec<String>) {
    if !node.can_use(level) {
        return;
    }
    let path = if prefix.is_empty() {
        node.usage_token()
    } else {
        format!("{prefix} {}", node.usage_token())
    };
    if node.executor().is_some() {
        out.push(path.clone());
    }
    for child in node.children() {
        collect_usage(child, level, path.clone(), out);
    }
}

fn normalize(input: &str) -> &str {
    let trimmed = input.trim_start();
    trimmed.strip_prefix('/').unwrap_or(trimmed)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
