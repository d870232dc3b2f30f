//! Persisted client state: pluggable string storage plus the stores built
//! on it. Reads never fail: a missing or corrupted value falls back to the
//! documented default.

mod app;
mod theme;

pub use app::{Activity, ActivityKind, AppSnapshot, AppStore, NewActivity, PreferencesUpdate, UserPreferences, MAX_ACTIVITIES};
pub use theme::{Theme, ThemeStore};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub const THEME_KEY: &str = "app-theme";
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebar-collapsed";
pub const RECENT_ACTIVITIES_KEY: &str = "recent-activities";
pub const USER_PREFERENCES_KEY: &str = "user-preferences";

/// Key/value string storage.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under `dir`. The directory is created on
/// first write.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(tmp, path)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Stored value for `key`, or `T::default()` when absent, unreadable or
/// not valid JSON for `T`.
pub fn load_or_default<T>(storage: &dyn Storage, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read persisted state, using defaults");
            return T::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "corrupted persisted state, using defaults");
        T::default()
    })
}

/// Best-effort write; failures are logged and otherwise ignored.
pub fn persist<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(io::Error::from)
        .and_then(|json| storage.set(key, &json));
    if let Err(e) = result {
        tracing::warn!(key, error = %e, "could not persist state");
    }
}
