use serde::Deserialize;

use begone_core::error::{BegoneError, Result};
use begone_core::ObjectId;

use crate::host::StaticRegistry;

/// Highest permission level a command source can hold.
pub const MAX_PERMISSION_LEVEL: u8 = 4;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    pub version: u32,

    #[serde(default)]
    pub rules: RulesSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub operator: OperatorSection,

    #[serde(default)]
    pub registry: RegistrySection,
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BegoneError::ConfigCorrupt(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        if self.rules.path.trim().is_empty() {
            return Err(BegoneError::ConfigCorrupt("rules.path must not be empty".into()));
        }
        if self.operator.permission_level > MAX_PERMISSION_LEVEL {
            return Err(BegoneError::ConfigCorrupt(format!(
                "operator.permission_level must be between 0 and {MAX_PERMISSION_LEVEL}"
            )));
        }
        self.registry.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesSection {
    /// Rules document location.
    #[serde(default = "default_rules_path")]
    pub path: String,
}

impl Default for RulesSection {
    fn default() -> Self {
        Self {
            path: default_rules_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// Identity used for commands arriving over the operator endpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorSection {
    #[serde(default = "default_operator_name")]
    pub name: String,

    #[serde(default = "default_permission_level")]
    pub permission_level: u8,
}

impl Default for OperatorSection {
    fn default() -> Self {
        Self {
            name: default_operator_name(),
            permission_level: default_permission_level(),
        }
    }
}

/// Objects and groups the host knows about.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    #[serde(default)]
    pub objects: Vec<String>,

    #[serde(default)]
    pub groups: Vec<String>,
}

impl RegistrySection {
    pub fn validate(&self) -> Result<()> {
        for o in &self.objects {
            ObjectId::parse(o).map_err(|e| {
                BegoneError::ConfigCorrupt(format!("registry.objects: {e}"))
            })?;
        }
        Ok(())
    }

    pub fn to_registry(&self) -> Result<StaticRegistry> {
        let objects = self
            .objects
            .iter()
            .map(|o| ObjectId::parse(o))
            .collect::<Result<Vec<_>>>()?;
        Ok(StaticRegistry::new(objects).with_groups(self.groups.iter().cloned()))
    }
}

fn default_rules_path() -> String {
    "config/itemsbegone_config.json".into()
}
fn default_listen() -> String {
    "127.0.0.1:8095".into()
}
fn default_operator_name() -> String {
    "console".into()
}
fn default_permission_level() -> u8 {
    MAX_PERMISSION_LEVEL
}
