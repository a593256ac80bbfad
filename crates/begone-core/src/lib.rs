//! begone core: host-agnostic rule model, object identifiers, policy
//! evaluation, and the shared error surface.
//!
//! This crate carries no runtime, persistence, or transport dependencies so
//! the policy can be evaluated anywhere a `RuleStore` snapshot is available.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `BegoneError`/`Result` so a malformed
//! rules document or operator typo can never take the host down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod object;
pub mod policy;
pub mod rules;

/// Shared result type.
pub use error::{BegoneError, ErrorCode, Result};
pub use object::ObjectId;
pub use policy::{DenyReason, MatchedRule, Verdict};
pub use rules::{Group, RuleStore, GLOBAL_GROUP};
