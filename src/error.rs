//! Error types for pomotrack.
//!
//! Invalid transitions are reported through [`SessionError`], resource
//! failures of the ticking machinery through [`TimerError`]. Everything
//! bubbles up as a [`TrackerError`].

use thiserror::Error;
use uuid::Uuid;

/// Crate-level error.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Configuration could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// YAML serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A session lifecycle operation was rejected.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The timer could not carry out an operation.
    #[error(transparent)]
    Timer(#[from] TimerError),

    /// User input could not be understood.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Rejected session lifecycle operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A session is already running on this manager.
    #[error("A session is already active: {id}")]
    AlreadyActive {
        /// Id of the session that is still active.
        id: Uuid,
    },

    /// The operation needs an active session and there is none.
    #[error("No active session")]
    NoActiveSession,
}

/// Failures of the ticking machinery.
#[derive(Error, Debug)]
pub enum TimerError {
    /// The background ticker thread could not be spawned.
    #[error("Timer ticker unavailable: {0}")]
    TickerUnavailable(#[source] std::io::Error),
}
