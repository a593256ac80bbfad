//! `begone.yaml` loading.
//!
//! Parsing is strict (`deny_unknown_fields` on every section) and is always
//! followed by [`RuntimeConfig::validate`], so a returned config is usable.

pub mod schema;

use std::fs;
use std::io;
use std::path::Path;

use begone_core::error::{BegoneError, Result};

pub use schema::{OperatorSection, RegistrySection, RulesSection, RuntimeConfig, ServerSection};

/// Read and validate the config at `path`. A missing file is an io error.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|e| BegoneError::Io(io::Error::new(e.kind(), format!("{}: {e}", path.display()))))?;
    load_from_str(&raw)
}

pub fn load_from_str(raw: &str) -> Result<RuntimeConfig> {
    let cfg = serde_yaml::from_str::<RuntimeConfig>(raw)
        .map_err(|e| BegoneError::ConfigCorrupt(format!("begone.yaml: {e}")))?;
    cfg.validate().map(|()| cfg)
}
