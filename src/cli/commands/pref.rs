//! Preference commands.

use serde_json::json;

use crate::cli::args::{OutputFormat, PrefCommands};
use crate::config::{FilePreferences, PreferenceStore};
use crate::error::TrackerError;
use crate::output::{format_preferences, to_json};

/// Execute pref subcommands.
///
/// # Errors
///
/// Returns an error if the preferences file cannot be written or output
/// formatting fails.
pub fn pref(
    prefs: &mut FilePreferences,
    cmd: PrefCommands,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match cmd {
        PrefCommands::Get { key, default } => {
            let value = prefs.get(&key, &default);
            match format {
                OutputFormat::Pretty => Ok(value),
                OutputFormat::Json => to_json(&json!({ "key": key, "value": value })),
            }
        }

        PrefCommands::Set { key, value } => {
            if key.trim().is_empty() {
                return Err(TrackerError::InvalidInput(
                    "Preference key cannot be empty".to_string(),
                ));
            }
            prefs.set(&key, &value)?;
            match format {
                OutputFormat::Pretty => Ok(format!("Set {key} = {value}")),
                OutputFormat::Json => to_json(&json!({ "key": key, "value": value })),
            }
        }

        PrefCommands::List => format_preferences(prefs.entries(), format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = FilePreferences::open(&temp_dir.path().join("p.yaml")).unwrap();

        let out = pref(
            &mut prefs,
            PrefCommands::Set {
                key: "timer.work_minutes".to_string(),
                value: "50".to_string(),
            },
            OutputFormat::Pretty,
        )
        .unwrap();
        assert_eq!(out, "Set timer.work_minutes = 50");

        let out = pref(
            &mut prefs,
            PrefCommands::Get {
                key: "timer.work_minutes".to_string(),
                default: "25".to_string(),
            },
            OutputFormat::Pretty,
        )
        .unwrap();
        assert_eq!(out, "50");
    }

    #[test]
    fn test_get_default_json() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = FilePreferences::open(&temp_dir.path().join("p.yaml")).unwrap();

        let out = pref(
            &mut prefs,
            PrefCommands::Get {
                key: "theme".to_string(),
                default: "light".to_string(),
            },
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["value"], "light");
    }

    #[test]
    fn test_empty_key_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = FilePreferences::open(&temp_dir.path().join("p.yaml")).unwrap();
        let result = pref(
            &mut prefs,
            PrefCommands::Set {
                key: " ".to_string(),
                value: "x".to_string(),
            },
            OutputFormat::Pretty,
        );
        assert!(result.is_err());
    }
}
