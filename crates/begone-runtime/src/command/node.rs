//! Command tree nodes.

use std::sync::Arc;

use begone_core::error::{BegoneError, Result};

use super::args::{ArgKind, ArgumentSpec, CommandContext, SuggestionProvider};

/// Command executor. `Ok` carries the confirmation shown to the operator.
pub type Handler<S> = Arc<dyn Fn(&CommandContext<'_, S>) -> Result<String> + Send + Sync>;

/// Who is running a command.
pub trait CommandSource {
    fn name(&self) -> &str;
    fn permission_level(&self) -> u8;

    fn has_permission_level(&self, level: u8) -> bool {
        self.permission_level() >= level
    }
}

pub enum NodeKind<S> {
    /// Matches one literal token (branch or command leaf).
    Literal(String),
    /// Accepts one typed token.
    Argument {
        name: String,
        kind: ArgKind,
        suggest: Option<SuggestionProvider<S>>,
    },
}

impl<S> Clone for NodeKind<S> {
    fn clone(&self) -> Self {
        match self {
            NodeKind::Literal(l) => NodeKind::Literal(l.clone()),
            NodeKind::Argument {
                name,
                kind,
                suggest,
            } => NodeKind::Argument {
                name: name.clone(),
                kind: *kind,
                suggest: suggest.clone(),
            },
        }
    }
}

pub struct CommandNode<S> {
    kind: NodeKind<S>,
    requirement: Option<u8>,
    executor: Option<Handler<S>>,
    children: Vec<CommandNode<S>>,
}

impl<S> Clone for CommandNode<S> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            requirement: self.requirement,
            executor: self.executor.clone(),
            children: self.children.clone(),
        }
    }
}

impl<S> CommandNode<S> {
    pub fn literal(name: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Literal(name.into()))
    }

    pub fn argument(spec: ArgumentSpec<S>) -> Self {
        Self::with_kind(NodeKind::Argument {
            name: spec.name,
            kind: spec.kind,
            suggest: spec.suggest,
        })
    }

    fn with_kind(kind: NodeKind<S>) -> Self {
        Self {
            kind,
            requirement: None,
            executor: None,
            children: Vec::new(),
        }
    }

    /// Guard: only sources with at least `level` can see this node.
    pub fn requires(mut self, level: u8) -> Self {
        self.requirement = Some(level);
        self
    }

    pub fn executes(mut self, handler: Handler<S>) -> Self {
        self.executor = Some(handler);
        self
    }

    pub fn then(mut self, child: CommandNode<S>) -> Self {
        self.children.push(child);
        self
    }

    pub fn kind(&self) -> &NodeKind<S> {
        &self.kind
    }

    /// Literal text or argument name.
    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Literal(l) => l,
            NodeKind::Argument { name, .. } => name,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal(_))
    }

    pub fn requirement(&self) -> Option<u8> {
        self.requirement
    }

    pub fn executor(&self) -> Option<&Handler<S>> {
        self.executor.as_ref()
    }

    pub fn children(&self) -> &[CommandNode<S>] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode<S>> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn can_use(&self, level: u8) -> bool {
        self.requirement.map_or(true, |req| level >= req)
    }

    /// Usage token (`lit` or `<arg>`).
    pub fn usage_token(&self) -> String {
        match &self.kind {
            NodeKind::Literal(l) => l.clone(),
            NodeKind::Argument { name, .. } => format!("<{name}>"),
        }
    }

    /// Fold `other` (a node with the same name) into `self`.
    ///
    /// Children with the same name merge recursively. Fails without touching
    /// `self` when both sides claim an executor, guards differ, or argument
    /// kinds differ.
    pub fn merge(&mut self, other: CommandNode<S>) -> Result<()> {
        self.check_merge(&other, self.name())?;
        self.merge_unchecked(other);
        Ok(())
    }

    fn check_merge(&self, other: &CommandNode<S>, path: &str) -> Result<()> {
        match (&self.kind, &other.kind) {
            (NodeKind::Literal(a), NodeKind::Literal(b)) if a == b => {}
            (NodeKind::Argument { name: a, kind: ka, .. }, NodeKind::Argument { name: b, kind: kb, .. })
                if a == b && ka == kb => {}
            _ => {
                return Err(BegoneError::DuplicateCommand(format!(
                    "'{path}' is declared with conflicting node types"
                )))
            }
        }
        if self.requirement != other.requirement {
            return Err(BegoneError::DuplicateCommand(format!(
                "'{path}' is declared with conflicting permission levels"
            )));
        }
        if self.executor.is_some() && other.executor.is_some() {
            return Err(BegoneError::DuplicateCommand(format!(
                "'{path}' already has an executor"
            )));
        }
        for oc in &other.children {
            if let Some(mine) = self.child(oc.name()) {
                mine.check_merge(oc, &format!("{path} {}", oc.usage_token()))?;
            }
        }
        Ok(())
    }

    fn merge_unchecked(&mut self, other: CommandNode<S>) {
        if self.executor.is_none() {
            self.executor = other.executor;
        }
        for oc in other.children {
            match self.children.iter_mut().find(|c| c.name() == oc.name()) {
                Some(mine) => mine.merge_unchecked(oc),
                None => self.children.push(oc),
            }
        }
    }
}
