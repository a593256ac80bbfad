//! Hierarchical command trees.
//!
//! `builder` compiles flat declarations into node chains, `dispatcher` owns
//! the registered trees and handles execution, permission guards and
//! completions.

pub mod args;
pub mod builder;
pub mod dispatcher;
pub mod node;

pub use args::{ArgKind, ArgValue, ArgumentSpec, CommandContext, SuggestionProvider};
pub use builder::{build, split_path, CommandSpec};
pub use dispatcher::{CommandDispatcher, CommandOutcome, FAILURE_MESSAGE};
pub use node::{CommandNode, CommandSource, Handler, NodeKind};
