//! Path resolution for pomotrack configuration files.
//!
//! All pomotrack data is stored in `~/.pomotrack/`:
//! - `config.yaml` - Main configuration file
//! - `preferences.yaml` - Key/value preferences

use std::path::PathBuf;

use crate::error::TrackerError;

/// Paths to pomotrack configuration files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.pomotrack/`
    pub root: PathBuf,
    /// Config file: `~/.pomotrack/config.yaml`
    pub config_file: PathBuf,
    /// Preferences file: `~/.pomotrack/preferences.yaml`
    pub preferences_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TrackerError> {
        let home = std::env::var("HOME").map_err(|_| {
            TrackerError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".pomotrack")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            preferences_file: root.join("preferences.yaml"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TrackerError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                TrackerError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fall back to the current directory if home cannot be determined
            Self::with_root(PathBuf::from(".pomotrack"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-pomotrack");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.preferences_file, root.join("preferences.yaml"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
    }
}
