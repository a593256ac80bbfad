use crate::command::CommandSource;
use crate::config::OperatorSection;

/// Fixed-identity command source (server console, operator endpoint, tests).
#[derive(Debug, Clone)]
pub struct OperatorSource {
    /// Shown in logs next to every command.
    pub name: String,
    pub permission_level: u8,
}

impl OperatorSource {
    pub fn new(name: impl Into<String>, permission_level: u8) -> Self {
        Self {
            name: name.into(),
            permission_level,
        }
    }

    pub fn from_config(cfg: &OperatorSection) -> Self {
        Self::new(cfg.name.clone(), cfg.permission_level)
    }
}

impl CommandSource for OperatorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn permission_level(&self) -> u8 {
        self.permission_level
    }
}
