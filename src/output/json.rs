//! JSON output formatting for pomotrack.
//!
//! This module provides functions for formatting sessions and analytics as JSON.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::error::TrackerError;
use crate::features::analytics::AnalyticsSummary;
use crate::features::session::Session;

/// Format a single session as JSON
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_session_json(session: &Session) -> Result<String, TrackerError> {
    Ok(serde_json::to_string_pretty(session)?)
}

/// Format finished sessions together with the analytics summary as JSON
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_report_json(
    sessions: &[Session],
    summary: &AnalyticsSummary,
) -> Result<String, TrackerError> {
    let output = json!({
        "count": sessions.len(),
        "sessions": sessions,
        "summary": summary,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format preferences as JSON
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_preferences_json(entries: &BTreeMap<String, String>) -> Result<String, TrackerError> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TrackerError> {
    Ok(serde_json::to_string_pretty(value)?)
}
