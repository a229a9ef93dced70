//! Configuration settings for pomotrack.
//!
//! Settings are loaded from `~/.pomotrack/config.yaml`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cli::args::OutputFormat;
use crate::config::PreferenceStore;
use crate::error::TrackerError;
use crate::features::timer::TimerKind;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Timer durations and cycle settings.
    pub timer: TimerConfig,
    /// Notification settings.
    pub notifications: NotificationConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Work session duration in minutes.
    #[serde(default = "default_work")]
    pub work_minutes: u64,
    /// Short break duration in minutes.
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u64,
    /// Long break duration in minutes.
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u64,
    /// Generic break duration in minutes.
    #[serde(default = "default_break")]
    pub break_minutes: u64,
    /// Custom timer duration in minutes.
    #[serde(default = "default_custom")]
    pub custom_minutes: u64,
    /// Number of work sessions before a long break.
    #[serde(default = "default_sessions_until_long_break")]
    pub sessions_until_long_break: u32,
    /// Tick interval in milliseconds. Each tick counts as one second.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Raise notifications at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Also notify when a session is stopped early.
    #[serde(default)]
    pub notify_abandoned: bool,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_work() -> u64 {
    TimerKind::Work.default_seconds() / 60
}

const fn default_short_break() -> u64 {
    TimerKind::ShortBreak.default_seconds() / 60
}

const fn default_long_break() -> u64 {
    TimerKind::LongBreak.default_seconds() / 60
}

const fn default_break() -> u64 {
    TimerKind::Break.default_seconds() / 60
}

const fn default_custom() -> u64 {
    TimerKind::Custom.default_seconds() / 60
}

const fn default_sessions_until_long_break() -> u32 {
    4
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            break_minutes: default_break(),
            custom_minutes: default_custom(),
            sessions_until_long_break: default_sessions_until_long_break(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            notify_abandoned: false,
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, TrackerError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), TrackerError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// The tick interval as a [`std::time::Duration`].
    #[must_use]
    pub const fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timer.tick_interval_ms)
    }
}

/// Effective timer lengths in seconds, per [`TimerKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDurations {
    /// Work session length.
    pub work: u64,
    /// Short break length.
    pub short_break: u64,
    /// Long break length.
    pub long_break: u64,
    /// Generic break length.
    pub break_: u64,
    /// Custom timer length.
    pub custom: u64,
    /// Work sessions per long break.
    pub sessions_until_long_break: u32,
}

/// Minutes as seconds, or `None` if that overflows.
const fn minutes_to_seconds(minutes: u64) -> Option<u64> {
    minutes.checked_mul(60)
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self::from_config(&TimerConfig::default())
    }
}

impl TimerDurations {
    /// Durations straight from the config file.
    ///
    /// A length too large to count in seconds falls back to the kind's
    /// default.
    #[must_use]
    pub fn from_config(timer: &TimerConfig) -> Self {
        let seconds = |minutes: u64, kind: TimerKind| {
            minutes_to_seconds(minutes).unwrap_or_else(|| {
                warn!(%kind, minutes, "configured length too large, using default");
                kind.default_seconds()
            })
        };

        Self {
            work: seconds(timer.work_minutes, TimerKind::Work),
            short_break: seconds(timer.short_break_minutes, TimerKind::ShortBreak),
            long_break: seconds(timer.long_break_minutes, TimerKind::LongBreak),
            break_: seconds(timer.break_minutes, TimerKind::Break),
            custom: seconds(timer.custom_minutes, TimerKind::Custom),
            sessions_until_long_break: timer.sessions_until_long_break,
        }
    }

    /// Durations from the config file, overridden by preferences.
    ///
    /// Recognized keys: `timer.work_minutes`, `timer.short_break_minutes`,
    /// `timer.long_break_minutes`, `timer.break_minutes`,
    /// `timer.custom_minutes`, `timer.sessions_until_long_break`.
    /// A preference too large to count in seconds is ignored.
    #[must_use]
    pub fn resolve(config: &Config, prefs: &dyn PreferenceStore) -> Self {
        let t = &config.timer;
        let base = Self::from_config(t);
        let minutes = |key: &str, configured_minutes: u64, configured: u64| {
            let value = prefs.get_u64(key, configured_minutes);
            minutes_to_seconds(value).unwrap_or_else(|| {
                warn!(key, value, "preference too large, using config value");
                configured
            })
        };
        let sessions = prefs.get_u64(
            "timer.sessions_until_long_break",
            u64::from(t.sessions_until_long_break),
        );

        Self {
            work: minutes("timer.work_minutes", t.work_minutes, base.work),
            short_break: minutes(
                "timer.short_break_minutes",
                t.short_break_minutes,
                base.short_break,
            ),
            long_break: minutes(
                "timer.long_break_minutes",
                t.long_break_minutes,
                base.long_break,
            ),
            break_: minutes("timer.break_minutes", t.break_minutes, base.break_),
            custom: minutes("timer.custom_minutes", t.custom_minutes, base.custom),
            sessions_until_long_break: u32::try_from(sessions)
                .unwrap_or(t.sessions_until_long_break),
        }
    }

    /// Length in seconds for a timer kind.
    #[must_use]
    pub const fn seconds_for(&self, kind: TimerKind) -> u64 {
        match kind {
            TimerKind::Work => self.work,
            TimerKind::ShortBreak => self.short_break,
            TimerKind::LongBreak => self.long_break,
            TimerKind::Break => self.break_,
            TimerKind::Custom => self.custom,
        }
    }
}
