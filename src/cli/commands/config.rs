//! Config file commands.

use colored::Colorize;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::TrackerError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the config file cannot be written, already exists
/// without `--force`, or output formatting fails.
pub fn config(
    paths: &Paths,
    current: &Config,
    cmd: ConfigCommands,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Pretty => {
                let yaml = serde_yaml::to_string(current)?;
                Ok(format!(
                    "{} {}\n{}",
                    "Config:".bold(),
                    paths.config_file.display(),
                    yaml.trim_end()
                ))
            }
            OutputFormat::Json => to_json(current),
        },

        ConfigCommands::Init { force } => {
            if paths.config_file.exists() && !force {
                return Err(TrackerError::Config(format!(
                    "{} already exists. Use --force to overwrite.",
                    paths.config_file.display()
                )));
            }
            paths.ensure_dirs()?;
            Config::default().save_to_path(&paths.config_file)?;
            Ok(format!("Wrote {}", paths.config_file.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join(".pomotrack"));

        config(&paths, &Config::default(), ConfigCommands::Init { force: false }, OutputFormat::Pretty)
            .unwrap();
        let loaded = Config::load_from_path(&paths.config_file).unwrap();
        assert_eq!(loaded.timer.work_minutes, 25);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join(".pomotrack"));
        let cmd = || ConfigCommands::Init { force: false };

        config(&paths, &Config::default(), cmd(), OutputFormat::Pretty).unwrap();
        assert!(config(&paths, &Config::default(), cmd(), OutputFormat::Pretty).is_err());
        assert!(config(
            &paths,
            &Config::default(),
            ConfigCommands::Init { force: true },
            OutputFormat::Pretty
        )
        .is_ok());
    }

    #[test]
    fn test_show_json() {
        let paths = Paths::with_root(std::path::PathBuf::from("/nonexistent"));
        let out = config(&paths, &Config::default(), ConfigCommands::Show, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["timer"]["sessions_until_long_break"], 4);
    }
}
