//! Top-level facade crate for begone.
//!
//! Re-exports the policy core and the runtime so hosts can depend on a single crate.

pub mod core {
    pub use begone_core::*;
}

pub mod runtime {
    pub use begone_runtime::*;
}
