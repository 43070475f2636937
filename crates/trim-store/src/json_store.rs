use crate::config::Config;
use crate::error::StoreError;
use crate::port::Persistence;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use trim_core::model::Decision;
use trim_core::reconcile::SampleLedger;

const TRIM_DIR: &str = ".trim";
const DECISIONS_FILE: &str = "decisions.json";
const CATEGORIES_FILE: &str = "categories.json";
const SAMPLES_FILE: &str = "samples.json";
const CONFIG_FILE: &str = "config.toml";

/// JSON files under a `.trim/` directory.
///
/// Each record lives in its own file and is replaced atomically
/// (temp file + rename). A file that fails to parse is copied aside to
/// `<name>.corrupt` before the default is used, so a later save cannot
/// destroy it.
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    dir: PathBuf,
}

impl JsonStore {
    /// Create `.trim/` under `path` with a default config.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let dir = root.join(TRIM_DIR);
        if dir.exists() {
            return Err(StoreError::WorkspaceExists(dir.display().to_string()));
        }
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(CONFIG_FILE), Config::default_toml())?;
        tracing::debug!(dir = %dir.display(), "initialized workspace");
        Ok(Self { root, dir })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let dir = root.join(TRIM_DIR);
        if !dir.is_dir() {
            return Err(StoreError::WorkspaceNotFound(root.display().to_string()));
        }
        Ok(Self { root, dir })
    }

    /// Search upward from `start` for a `.trim/` directory and open it.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut current = start.as_ref().to_path_buf();
        loop {
            if current.join(TRIM_DIR).is_dir() {
                return Self::open(&current);
            }
            if !current.pop() {
                return Err(StoreError::WorkspaceNotFound(
                    start.as_ref().display().to_string(),
                ));
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn config(&self) -> Config {
        Config::load(&self.config_path())
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.dir.join(name);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read file; using defaults");
                return T::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(value) => value,
            Err(e) => {
                let backup = self.dir.join(format!("{}.corrupt", name));
                tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "corrupt data; using defaults"
                );
                if let Err(e) = fs::copy(&path, &backup) {
                    tracing::warn!(error = %e, "could not back up corrupt file");
                }
                T::default()
            }
        }
    }

    fn write_atomic<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(self.dir.join(name))
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl Persistence for JsonStore {
    fn load_decisions(&self) -> Vec<Decision> {
        self.read_or_default(DECISIONS_FILE)
    }

    fn save_decisions(&mut self, decisions: &[Decision]) -> Result<(), StoreError> {
        self.write_atomic(DECISIONS_FILE, decisions)
    }

    fn load_categories(&self) -> Vec<String> {
        self.read_or_default(CATEGORIES_FILE)
    }

    fn save_categories(&mut self, categories: &[String]) -> Result<(), StoreError> {
        self.write_atomic(CATEGORIES_FILE, categories)
    }

    fn load_sample_ledger(&self) -> SampleLedger {
        self.read_or_default(SAMPLES_FILE)
    }

    fn save_sample_ledger(&mut self, ledger: &SampleLedger) -> Result<(), StoreError> {
        self.write_atomic(SAMPLES_FILE, ledger)
    }
}
