//! Configuration management for pomotrack.
//!
//! This module handles loading and saving configuration from `~/.pomotrack/`,
//! and the key/value preference store layered on top of it.

mod paths;
mod preferences;
mod settings;

pub use paths::Paths;
pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore};
pub use settings::{ColorSetting, Config, GeneralConfig, NotificationConfig, TimerConfig, TimerDurations};
