//! Rules document persistence.
//!
//! `JsonFilePersistence` rewrites the whole document through a sibling temp
//! file + `rename`, so readers never observe a half-written file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use begone_core::error::{BegoneError, Result};
use begone_core::RuleStore;

/// Where the rules document lives.
pub trait RulePersistence: Send + Sync {
    /// `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<RuleStore>>;
    fn save(&self, store: &RuleStore) -> Result<()>;
}

/// Pretty-printed JSON file on disk.
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RulePersistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<RuleStore>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&self.path)?;
        RuleStore::from_json(&s).map(Some)
    }

    fn save(&self, store: &RuleStore) -> Result<()> {
        let body = store.to_json_pretty()?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process document, used by tests and embedders without a filesystem.
#[derive(Default)]
pub struct MemoryPersistence {
    doc: Mutex<Option<String>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing (possibly corrupt) document.
    pub fn with_document(json: impl Into<String>) -> Self {
        Self {
            doc: Mutex::new(Some(json.into())),
            ..Self::default()
        }
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Raw persisted document.
    pub fn document(&self) -> Option<String> {
        self.doc.lock().ok().and_then(|d| d.clone())
    }

    /// Make subsequent saves fail with an io error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }
}

impl RulePersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<RuleStore>> {
        match self.document() {
            Some(s) => RuleStore::from_json(&s).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, store: &RuleStore) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(BegoneError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "write refused",
            )));
        }
        let body = store.to_json_pretty()?;
        let mut doc = self
            .doc
            .lock()
            .map_err(|_| BegoneError::Internal("memory persistence lock poisoned".into()))?;
        *doc = Some(body);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
