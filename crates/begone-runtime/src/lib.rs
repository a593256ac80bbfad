//! begone runtime library entry.
//!
//! Wires the command tree, blacklist command catalog, rule persistence,
//! enforcement coordinator and the operator HTTP surface into one stack. It is
//! consumed by the binary (`main.rs`), by hosts embedding the enforcement
//! hooks, and by integration tests.

pub mod app_state;
pub mod catalog;
pub mod command;
pub mod config;
pub mod context;
pub mod enforce;
pub mod host;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
