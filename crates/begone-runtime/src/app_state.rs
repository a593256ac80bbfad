//! Shared application state for the begone runtime.
//!
//! Wires the rule store, command dispatcher (with the blacklist catalog) and
//! enforcement coordinator together. Startup errors are explicit (Result
//! instead of panic) so the binary can refuse to start on corrupt rules.

use std::sync::Arc;

use begone_core::error::Result;

use crate::catalog;
use crate::command::{CommandDispatcher, CommandOutcome};
use crate::config::RuntimeConfig;
use crate::context::OperatorSource;
use crate::enforce::EnforcementCoordinator;
use crate::host::ObjectRegistry;
use crate::obs::RuntimeMetrics;
use crate::store::{JsonFilePersistence, SharedRules};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    rules: SharedRules,
    dispatcher: Arc<CommandDispatcher<OperatorSource>>,
    enforcement: Arc<EnforcementCoordinator>,
    metrics: Arc<RuntimeMetrics>,
}

struct AppStateInner {
    cfg: RuntimeConfig,
    operator: OperatorSource,
}

impl AppState {
    /// Load rules from `cfg.rules.path` (creating defaults when absent) and
    /// build the full stack. `ConfigCorrupt` from the rules document is fatal.
    pub fn new(cfg: RuntimeConfig) -> Result<Self> {
        let persistence = Arc::new(JsonFilePersistence::new(cfg.rules.path.clone()));
        tracing::info!(path = %persistence.path().display(), "loading rules document");
        let rules = SharedRules::load_or_init(persistence)?;
        let registry: Arc<dyn ObjectRegistry> = Arc::new(cfg.registry.to_registry()?);
        Self::with_parts(cfg, rules, registry)
    }

    /// Build from an existing store and registry (embedders, tests).
    pub fn with_parts(
        cfg: RuntimeConfig,
        rules: SharedRules,
        registry: Arc<dyn ObjectRegistry>,
    ) -> Result<Self> {
        rules.log_summary()?;

        let metrics = Arc::new(RuntimeMetrics::default());
        let dispatcher = CommandDispatcher::new();
        catalog::register(&dispatcher, rules.clone(), registry)?;

        let enforcement =
            EnforcementCoordinator::new(rules.clone()).with_metrics(Arc::clone(&metrics));
        let operator = OperatorSource::from_config(&cfg.operator);

        tracing::info!(
            roots = ?dispatcher.root_names(),
            operator = %operator.name,
            level = operator.permission_level,
            "command tree registered"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, operator }),
            rules,
            dispatcher: Arc::new(dispatcher),
            enforcement: Arc::new(enforcement),
            metrics,
        })
    }

    pub fn cfg(&self) -> &RuntimeConfig {
        &self.inner.cfg
    }

    pub fn operator(&self) -> &OperatorSource {
        &self.inner.operator
    }

    pub fn rules(&self) -> &SharedRules {
        &self.rules
    }

    pub fn dispatcher(&self) -> Arc<CommandDispatcher<OperatorSource>> {
        Arc::clone(&self.dispatcher)
    }

    /// The `ActionHook` implementation hosts call into.
    pub fn enforcement(&self) -> Arc<EnforcementCoordinator> {
        Arc::clone(&self.enforcement)
    }

    pub fn metrics(&self) -> Arc<RuntimeMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run a command line as the configured operator.
    pub fn run_command(&self, input: &str) -> CommandOutcome {
        let outcome = self.dispatcher.execute(self.operator(), input);
        self.metrics.record_command(&outcome);
        outcome
    }

    pub fn suggest(&self, input: &str) -> Vec<String> {
        self.dispatcher.suggest(self.operator(), input)
    }
}
