//! Persisted settings for the RTL engine.
//!
//! This crate provides the typed settings struct shared by every surface
//! (page engine, control panel, driver binary) and the store abstraction
//! behind which they are persisted. Absent keys fall back per field, so a
//! partially written or missing settings file behaves like a fresh install.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Settings shared across all extension surfaces.
///
/// `enabled_sites` is an opt-in list: no site is processed until the user
/// enables it explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub extension_active: bool,
    pub visual_feedback_enabled: bool,
    pub enabled_sites: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extension_active: true,
            visual_feedback_enabled: true,
            enabled_sites: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("settings could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("settings store is unavailable")]
    Unavailable,
}

/// Key-value persistence boundary. Reads deliver the whole mapping at once;
/// writes are fire-and-forget from the engine's point of view (it logs and
/// proceeds on failure).
pub trait SettingsStore {
    fn load(&self) -> Result<Settings, StoreError>;
    fn save(&self, settings: &Settings) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and as a default collaborator.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Settings>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings, StoreError> {
        self.inner
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| StoreError::Unavailable)
    }

    fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().map_err(|_| StoreError::Unavailable)?;
        *guard = settings.clone();
        Ok(())
    }
}

/// TOML file store. A missing file is not an error: it loads as defaults,
/// exactly like a freshly installed extension.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<Settings, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Hostname of a page URL, or an empty string when it cannot be determined.
/// An empty hostname never matches the enabled-site list, so unparseable
/// URLs degrade to "never process".
pub fn hostname_of(page_url: &str) -> String {
    url::Url::parse(page_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_default()
}
