//! Process-wide rule store handle.
//!
//! `SharedRules` is cloned into every component that needs the rules. Reads
//! (policy evaluation) take the read side of the lock; command mutations take
//! the write side and are write-through: the change is applied to a copy, the
//! copy is persisted, and only then installed. A failed write leaves the
//! in-memory rules untouched.

pub mod persistence;

use std::sync::{Arc, RwLock};

use begone_core::error::Result;
use begone_core::RuleStore;

pub use persistence::{JsonFilePersistence, MemoryPersistence, RulePersistence};

#[derive(Clone)]
pub struct SharedRules {
    inner: Arc<RwLock<RuleStore>>,
    persistence: Arc<dyn RulePersistence>,
}

impl SharedRules {
    /// Load persisted rules, or create and persist the default document.
    ///
    /// A document that exists but fails validation is `ConfigCorrupt`; callers
    /// must refuse to start rather than run with defaults.
    pub fn load_or_init(persistence: Arc<dyn RulePersistence>) -> Result<Self> {
        let store = match persistence.load()? {
            Some(store) => store,
            None => {
                tracing::warn!("rules document did not exist, so it was created with default values");
                let store = RuleStore::default();
                persistence.save(&store)?;
                store
            }
        };
        Ok(Self::new(store, persistence))
    }

    /// Wrap an already-loaded store without writing it.
    pub fn new(store: RuleStore, persistence: Arc<dyn RulePersistence>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
            persistence,
        }
    }

    /// Run `f` against the current rules under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&RuleStore) -> T) -> Result<T> {
        let guard = self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("rule store lock was poisoned by a panicking writer; recovering");
            self.inner.clear_poison();
            poisoned.into_inner()
        });
        Ok(f(&guard))
    }

    pub fn snapshot(&self) -> Result<RuleStore> {
        self.read(RuleStore::clone)
    }

    /// Apply `f` to a copy, persist the copy, then install it.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut RuleStore) -> Result<T>) -> Result<T> {
        // The guarded store is only ever replaced wholesale, so a writer that
        // panicked mid-`f` left it intact and the poison can be cleared.
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("rule store lock was poisoned by a panicking writer; recovering");
            self.inner.clear_poison();
            poisoned.into_inner()
        });
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persistence.save(&next)?;
        *guard = next;
        Ok(out)
    }

    /// Log every group, the way operators expect to see it at startup.
    pub fn log_summary(&self) -> Result<()> {
        self.read(|store| {
            tracing::info!(delete_on_deny = store.delete_on_deny(), groups = store.groups().len(), "rules loaded");
            for g in store.groups() {
                tracing::info!(
                    group = %g.name(),
                    state = if g.enabled() { "enabled" } else { "disabled" },
                    namespaces = ?g.category_blacklist(),
                    items = ?g.item_blacklist(),
                    "group rules"
                );
            }
        })
    }
}
