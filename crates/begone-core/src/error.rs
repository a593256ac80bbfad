//! Shared error type across begone crates.

use thiserror::Error;

/// Stable error codes (operator-facing API and metrics labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Referenced group does not exist.
    NoSuchGroup,
    /// Malformed or unknown category/object reference.
    InvalidRule,
    /// Mutation would not change anything (rule already present/absent).
    RuleConflict,
    /// Command argument failed to parse.
    BadArgument,
    /// Input did not match any registered command.
    UnknownCommand,
    /// Two command declarations claim the same node.
    DuplicateCommand,
    /// Persisted rules failed structural validation.
    ConfigCorrupt,
    /// Unexpected failure inside a command handler.
    HandlerFault,
    /// Filesystem failure.
    Io,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NoSuchGroup => "NO_SUCH_GROUP",
            ErrorCode::InvalidRule => "INVALID_RULE",
            ErrorCode::RuleConflict => "RULE_CONFLICT",
            ErrorCode::BadArgument => "BAD_ARGUMENT",
            ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
            ErrorCode::DuplicateCommand => "DUPLICATE_COMMAND",
            ErrorCode::ConfigCorrupt => "CONFIG_CORRUPT",
            ErrorCode::HandlerFault => "HANDLER_FAULT",
            ErrorCode::Io => "IO",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BegoneError>;

/// Unified error type used by core and runtime.
#[derive(Debug, Error)]
pub enum BegoneError {
    #[error("No such group '{0}'!")]
    NoSuchGroup(String),
    #[error("{0}")]
    InvalidRule(String),
    #[error("{0}")]
    RuleConflict(String),
    #[error("{0}")]
    BadArgument(String),
    #[error("{0}")]
    UnknownCommand(String),
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    #[error("config corrupt: {0}")]
    ConfigCorrupt(String),
    #[error("handler fault: {0}")]
    HandlerFault(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl BegoneError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            BegoneError::NoSuchGroup(_) => ErrorCode::NoSuchGroup,
            BegoneError::InvalidRule(_) => ErrorCode::InvalidRule,
            BegoneError::RuleConflict(_) => ErrorCode::RuleConflict,
            BegoneError::BadArgument(_) => ErrorCode::BadArgument,
            BegoneError::UnknownCommand(_) => ErrorCode::UnknownCommand,
            BegoneError::DuplicateCommand(_) => ErrorCode::DuplicateCommand,
            BegoneError::ConfigCorrupt(_) => ErrorCode::ConfigCorrupt,
            BegoneError::HandlerFault(_) => ErrorCode::HandlerFault,
            BegoneError::Io(_) => ErrorCode::Io,
            BegoneError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether the message is safe and meaningful to show an operator.
    ///
    /// Everything else is reported as an opaque failure and logged server-side.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BegoneError::NoSuchGroup(_)
                | BegoneError::InvalidRule(_)
                | BegoneError::RuleConflict(_)
                | BegoneError::BadArgument(_)
                | BegoneError::UnknownCommand(_)
        )
    }
}
