use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};

use super::store::LoginPrefs;

/// Preferences file name inside the config directory
const PREFS_FILE: &str = "login_prefs.json";

/// Persistence backend for the login preferences namespace.
///
/// The store is backend-agnostic: anything that can round-trip the prefs
/// record works. Production uses `FilePrefs`; tests use `MemoryPrefs`.
pub trait PrefsBackend: Send {
    /// Load the persisted record, or `None` if nothing was ever written
    fn load(&self) -> Result<Option<LoginPrefs>>;

    /// Persist the record, replacing any previous contents
    fn store(&self, prefs: &LoginPrefs) -> Result<()>;
}

/// JSON-file backend, one `login_prefs.json` per directory.
pub struct FilePrefs {
    path: PathBuf,
}

impl FilePrefs {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(PREFS_FILE),
        }
    }
}

impl PrefsBackend for FilePrefs {
    fn load(&self) -> Result<Option<LoginPrefs>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read login prefs file")?;
        let prefs: LoginPrefs = serde_json::from_str(&contents)
            .context("Failed to parse login prefs file")?;

        Ok(Some(prefs))
    }

    fn store(&self, prefs: &LoginPrefs) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-memory backend. Nothing touches disk; state dies with the process.
#[derive(Default)]
pub struct MemoryPrefs {
    prefs: Mutex<Option<LoginPrefs>>,
}

impl PrefsBackend for MemoryPrefs {
    fn load(&self) -> Result<Option<LoginPrefs>> {
        let guard = self
            .prefs
            .lock()
            .map_err(|_| anyhow!("prefs lock poisoned"))?;
        Ok(guard.clone())
    }

    fn store(&self, prefs: &LoginPrefs) -> Result<()> {
        let mut guard = self
            .prefs
            .lock()
            .map_err(|_| anyhow!("prefs lock poisoned"))?;
        *guard = Some(prefs.clone());
        Ok(())
    }
}
