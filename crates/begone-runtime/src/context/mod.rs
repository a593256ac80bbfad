//! Command source types shared across layers.
//!
//! The operator endpoint runs every command as the configured console source;
//! hosts embedding the runtime bring their own `CommandSource`.

pub mod operator;

pub use operator::OperatorSource;
