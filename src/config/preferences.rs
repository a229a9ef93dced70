//! Key/value preference store.
//!
//! The timer core only ever reads and writes preferences through
//! [`PreferenceStore`]; the storage format belongs to the implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TrackerError;

/// A flat string key/value store.
pub trait PreferenceStore {
    /// Value stored under `key`, or `default` when absent.
    fn get(&self, key: &str, default: &str) -> String;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError>;

    /// Value under `key` parsed as an integer, or `default` when absent or unparsable.
    fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.get(key, &default.to_string())
            .trim()
            .parse()
            .unwrap_or(default)
    }

    /// Value under `key` parsed as a boolean, or `default` when absent or unparsable.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key, "").trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => true,
            "false" | "no" | "off" | "0" => false,
            _ => default,
        }
    }
}

/// In-process preferences.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences persisted as a YAML map, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self, TrackerError> {
        let values = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                TrackerError::Config(format!(
                    "Failed to read preferences {}: {e}",
                    path.display()
                ))
            })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_yaml::from_str(&contents).map_err(|e| {
                    TrackerError::Config(format!(
                        "Failed to parse preferences {}: {e}",
                        path.display()
                    ))
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// All stored keys and values.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    fn flush(&self) -> Result<(), TrackerError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_yaml::to_string(&self.values)?;
        std::fs::write(&self.path, contents).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to write preferences {}: {e}",
                self.path.display()
            ))
        })
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError> {
        debug!(key, value, "preference set");
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
