//! Feature implementations for pomotrack.
//!
//! - Countdown timer state machine
//! - Session management
//! - Tasks
//! - Analytics aggregation
//! - Notifications

pub mod analytics;
pub mod notifications;
pub mod session;
pub mod tasks;
pub mod timer;
