use std::collections::BTreeMap;

use colored::Colorize;

use crate::features::analytics::AnalyticsSummary;
use crate::features::session::Session;
use crate::features::timer::{format_duration, format_mmss, render_progress_bar};

/// Format a single session as pretty output
pub fn format_session_pretty(session: &Session) -> String {
    let icon = match (session.is_finalized(), session.completed) {
        (false, _) => "[>]".cyan(),
        (true, true) => "[x]".green(),
        (true, false) => "[-]".yellow(),
    };

    let mut output = format!("{} {}\n", icon, session.format_status().bold());
    output.push_str(&format!(
        "  Started:  {}\n",
        session.started_at_local().format("%Y-%m-%d %H:%M:%S")
    ));
    if let Some(ended) = session.ended_at {
        output.push_str(&format!(
            "  Ended:    {}\n",
            ended.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
        ));
    }
    output.push_str(&format!("  ID:       {}", session.id.to_string().dimmed()));
    output
}

/// Format the analytics summary as pretty output
pub fn format_summary_pretty(summary: &AnalyticsSummary) -> String {
    let mut output = "Analytics\n".bold().to_string();
    output.push_str(&"─".repeat(40));
    output.push('\n');

    #[allow(clippy::cast_sign_loss)]
    let focus = format_duration(summary.focus_seconds.max(0) as u64);
    output.push_str(&format!("  Sessions:        {}\n", summary.sessions));
    output.push_str(&format!("  Focus time:      {}\n", focus.cyan()));
    output.push_str(&format!("  Tasks completed: {}\n", summary.completed_tasks));
    output.push_str(&format!(
        "  Productivity:    {} {:.0}",
        render_progress_bar(summary.productivity_score / 100.0, 20),
        summary.productivity_score
    ));
    output
}

/// Format finished sessions followed by the analytics summary
pub fn format_report_pretty(sessions: &[Session], summary: &AnalyticsSummary) -> String {
    let mut output = String::new();
    for session in sessions {
        output.push_str(&format_session_pretty(session));
        output.push_str("\n\n");
    }
    output.push_str(&format_summary_pretty(summary));
    output
}

/// Format preferences as pretty output
pub fn format_preferences_pretty(entries: &BTreeMap<String, String>) -> String {
    if entries.is_empty() {
        return "Preferences (0)\n  No preferences set".to_string();
    }

    let mut output = format!("Preferences ({})\n", entries.len());
    output.push_str(&"─".repeat(40));
    output.push('\n');

    for (key, value) in entries {
        output.push_str(&format!("  {} = {}\n", key.bold(), value));
    }

    output
}

/// Single-line countdown shown while a session runs
pub fn format_tick_line(label: &str, remaining: u64, progress: f64) -> String {
    format!(
        "{} {} {}",
        label.bold(),
        format_mmss(remaining).cyan(),
        render_progress_bar(progress, 30)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tasks::Task;
    use crate::features::timer::TimerKind;
    use chrono::{Duration, TimeZone, Utc};

    fn make_session(completed: bool) -> Session {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let task = Task::new("Write docs");
        let mut session = Session::begin(TimerKind::Work, 1500, Some(task.to_ref()), start);
        session.finish(start + Duration::minutes(25), completed);
        session
    }

    #[test]
    fn test_format_session_pretty() {
        colored::control::set_override(false);
        let output = format_session_pretty(&make_session(true));
        assert!(output.starts_with("[x] Work session on \"Write docs\""));
        assert!(output.contains("(completed)"));
        assert!(output.contains("Ended:"));
    }

    #[test]
    fn test_format_summary_pretty() {
        colored::control::set_override(false);
        let summary = AnalyticsSummary {
            sessions: 2,
            completed_tasks: 3,
            focus_seconds: 600,
            productivity_score: 30.0,
            active_days: 1,
        };
        let output = format_summary_pretty(&summary);
        assert!(output.contains("Sessions:        2"));
        assert!(output.contains("10 minutes"));
        assert!(output.contains("Tasks completed: 3"));
        assert!(output.ends_with(" 30"));
    }

    #[test]
    fn test_format_preferences_pretty_empty() {
        let output = format_preferences_pretty(&BTreeMap::new());
        assert!(output.contains("No preferences set"));
    }

    #[test]
    fn test_format_tick_line() {
        colored::control::set_override(false);
        let line = format_tick_line("Work", 90, 0.5);
        assert!(line.starts_with("Work 01:30 ["));
    }
}
