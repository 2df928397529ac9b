//! Persisted editor session
//!
//! The buffer is saved under one fixed key on every accepted edit and read
//! back once at startup. Storage problems never stop the session; the app
//! keeps running in memory.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Key the buffer snapshot is stored under
pub const SESSION_KEY: &str = "cstview.buffer";

/// Storage errors
#[derive(Debug)]
pub enum StoreError {
    /// No place to store anything (e.g. no config directory)
    Unavailable(String),
    Io(std::io::Error),
    /// The stored file exists but is not a valid store
    Corrupt(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(reason) => write!(f, "Storage unavailable: {}", reason),
            StoreError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StoreError::Corrupt(e) => write!(f, "Storage file is corrupt: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Unavailable(_) => None,
            StoreError::Io(e) => Some(e),
            StoreError::Corrupt(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e)
    }
}

/// Durable client-local key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// On-disk layout of a [`FileStore`]
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    /// Schema version for forward compatibility
    #[serde(default)]
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl StoreFile {
    const CURRENT_VERSION: u32 = 1;
}

/// JSON file store, rewritten through a temp file on every `set`
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.config/cstview/session.json`
    pub fn open_default() -> Result<Self, StoreError> {
        crate::config_paths::session_file()
            .map(Self::new)
            .ok_or_else(|| StoreError::Unavailable("No config directory available".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoreFile, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.entries.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is overwritten
        let mut file = self.read().unwrap_or_default();
        file.version = StoreFile::CURRENT_VERSION;
        file.entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&file)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// The buffer snapshot under [`SESSION_KEY`]
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Session backed by a [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Last persisted buffer, if any
    ///
    /// Read failures are logged and treated as "no session".
    pub fn restore(&self) -> Option<String> {
        match self.store.get(SESSION_KEY) {
            Ok(Some(text)) => {
                tracing::info!("Restored session buffer ({} bytes)", text.len());
                Some(text)
            }
            Ok(None) => {
                tracing::debug!("No saved session");
                None
            }
            Err(e) => {
                tracing::warn!("Could not read saved session: {}", e);
                None
            }
        }
    }

    pub fn persist(&mut self, text: &str) -> Result<(), StoreError> {
        self.store.set(SESSION_KEY, text)
    }
}
