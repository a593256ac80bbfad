//! Typed command arguments.

use std::collections::HashMap;
use std::sync::Arc;

use begone_core::error::{BegoneError, Result};
use begone_core::ObjectId;

/// Completion candidates for a partially typed argument.
///
/// Called lazily, once per completion request, with the source asking and the
/// partial token.
pub type SuggestionProvider<S> = Arc<dyn Fn(&S, &str) -> Vec<String> + Send + Sync>;

/// Value type accepted by an argument node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Single whitespace-free token.
    Word,
    /// `true` / `false`.
    Bool,
    /// `category:path` object identifier.
    Object,
}

impl ArgKind {
    pub fn parse(self, token: &str) -> Result<ArgValue> {
        match self {
            ArgKind::Word => Ok(ArgValue::Word(token.to_string())),
            ArgKind::Bool => match token {
                "true" => Ok(ArgValue::Bool(true)),
                "false" => Ok(ArgValue::Bool(false)),
                _ => Err(BegoneError::BadArgument(format!(
                    "Invalid boolean, expected true or false but found '{token}'"
                ))),
            },
            ArgKind::Object => ObjectId::parse(token)
                .map(ArgValue::Object)
                .map_err(|e| BegoneError::BadArgument(e.to_string())),
        }
    }

    /// Completions available without a provider.
    pub(crate) fn builtin_suggestions(self) -> &'static [&'static str] {
        match self {
            ArgKind::Bool => &["false", "true"],
            _ => &[],
        }
    }
}

/// Parsed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Word(String),
    Bool(bool),
    Object(ObjectId),
}

/// One argument of a command declaration.
pub struct ArgumentSpec<S> {
    pub name: String,
    pub kind: ArgKind,
    pub suggest: Option<SuggestionProvider<S>>,
}

impl<S> ArgumentSpec<S> {
    pub fn new(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            kind,
            suggest: None,
        }
    }

    pub fn word(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Word)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Bool)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Object)
    }

    pub fn suggests<F>(mut self, f: F) -> Self
    where
        F: Fn(&S, &str) -> Vec<String> + Send + Sync + 'static,
    {
        self.suggest = Some(Arc::new(f));
        self
    }
}

/// Execution context handed to a command handler.
pub struct CommandContext<'a, S> {
    source: &'a S,
    args: HashMap<String, ArgValue>,
}

impl<'a, S> CommandContext<'a, S> {
    pub(crate) fn new(source: &'a S, args: HashMap<String, ArgValue>) -> Self {
        Self { source, args }
    }

    pub fn source(&self) -> &S {
        self.source
    }

    pub fn word(&self, name: &str) -> Result<&str> {
        match self.arg(name)? {
            ArgValue::Word(w) => Ok(w),
            other => Err(mismatch(name, "word", other)),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.arg(name)? {
            ArgValue::Bool(b) => Ok(*b),
            other => Err(mismatch(name, "bool", other)),
        }
    }

    pub fn object(&self, name: &str) -> Result<&ObjectId> {
        match self.arg(name)? {
            ArgValue::Object(o) => Ok(o),
            other => Err(mismatch(name, "object", other)),
        }
    }

    // A missing or mistyped argument means the declaration and handler
    // disagree, so these surface as internal errors rather than bad input.
    fn arg(&self, name: &str) -> Result<&ArgValue> {
        self.args
            .get(name)
            .ok_or_else(|| BegoneError::Internal(format!("argument '{name}' was not parsed")))
    }
}

fn mismatch(name: &str, expected: &str, got: &ArgValue) -> BegoneError {
    BegoneError::Internal(format!("argument '{name}' is not a {expected}: {got:?}"))
}
