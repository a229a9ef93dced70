//! Output formatting for pomotrack.
//!
//! This module provides formatters for displaying sessions and analytics in various formats.

mod json;
mod pretty;

use std::collections::BTreeMap;

use crate::cli::args::OutputFormat;
use crate::error::TrackerError;
use crate::features::analytics::AnalyticsSummary;
use crate::features::session::Session;

pub use json::*;
pub use pretty::*;

/// Format a session based on output format
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_session(session: &Session, format: OutputFormat) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session)),
        OutputFormat::Json => format_session_json(session),
    }
}

/// Format finished sessions and the analytics summary based on output format
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_report(
    sessions: &[Session],
    summary: &AnalyticsSummary,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_report_pretty(sessions, summary)),
        OutputFormat::Json => format_report_json(sessions, summary),
    }
}

/// Format preferences based on output format
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_preferences(
    entries: &BTreeMap<String, String>,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_preferences_pretty(entries)),
        OutputFormat::Json => format_preferences_json(entries),
    }
}
