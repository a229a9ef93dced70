//! Timer kinds and the pomodoro cycle.

use serde::{Deserialize, Serialize};

/// Kind of countdown a timer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Focused work (25 minutes)
    Work,
    /// Short break (5 minutes)
    ShortBreak,
    /// Long break (15 minutes)
    LongBreak,
    /// User-chosen length (25 minutes unless overridden)
    Custom,
    /// Generic break (5 minutes)
    Break,
}

impl TimerKind {
    /// Default length in seconds.
    #[must_use]
    pub const fn default_seconds(&self) -> u64 {
        match self {
            Self::Work | Self::Custom => 25 * 60,
            Self::ShortBreak | Self::Break => 5 * 60,
            Self::LongBreak => 15 * 60,
        }
    }

    /// Parse a timer kind from user input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "work" | "pomodoro" | "pomo" | "w" => Some(Self::Work),
            "short" | "short-break" | "short_break" | "sb" => Some(Self::ShortBreak),
            "long" | "long-break" | "long_break" | "lb" => Some(Self::LongBreak),
            "custom" | "c" => Some(Self::Custom),
            "break" | "b" => Some(Self::Break),
            _ => None,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
            Self::Custom => "Custom",
            Self::Break => "Break",
        }
    }

    /// Check if this is a break type.
    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak | Self::Break)
    }
}

impl std::fmt::Display for TimerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// What to run after `after`, given how many work sessions have completed.
///
/// Work is followed by a break; every `sessions_until_long_break`-th
/// completed work session earns a long break. Breaks are followed by work.
#[must_use]
pub const fn next_kind(after: TimerKind, completed_work: u32, sessions_until_long_break: u32) -> TimerKind {
    if after.is_break() {
        return TimerKind::Work;
    }
    if sessions_until_long_break > 0
        && completed_work > 0
        && completed_work % sessions_until_long_break == 0
    {
        TimerKind::LongBreak
    } else {
        TimerKind::ShortBreak
    }
}
