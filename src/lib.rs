//! pomotrack - a Pomodoro focus tracker
//!
//! This crate provides a countdown timer state machine that ticks on its own
//! thread and notifies listeners, a session manager that turns timer runs
//! into finalized sessions, and an analytics engine that aggregates sessions
//! and completed tasks into daily statistics and a productivity score.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TrackerError;
pub use features::analytics::Analytics;
pub use features::session::{Session, SessionManager};
pub use features::timer::{Timer, TimerKind, TimerState};
