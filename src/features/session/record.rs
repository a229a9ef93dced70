//! Finalized session records.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::local_date;
use crate::features::tasks::TaskRef;
use crate::features::timer::{format_mmss, TimerKind};

/// One run of the timer, from start to completion or stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: Uuid,
    /// Timer kind the session ran
    pub kind: TimerKind,
    /// Task worked on, if any
    pub task: Option<TaskRef>,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session ended (None while active)
    pub ended_at: Option<DateTime<Utc>>,
    /// Planned countdown length in seconds
    pub planned_seconds: u64,
    /// Wall-clock length, `ended_at - started_at`, in seconds
    pub duration_seconds: i64,
    /// True if the countdown ran to zero
    pub completed: bool,
}

impl Session {
    /// Open a session at `started_at`.
    #[must_use]
    pub fn begin(
        kind: TimerKind,
        planned_seconds: u64,
        task: Option<TaskRef>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            task,
            started_at,
            ended_at: None,
            planned_seconds,
            duration_seconds: 0,
            completed: false,
        }
    }

    /// Close the session at `ended_at`.
    pub fn finish(&mut self, ended_at: DateTime<Utc>, completed: bool) {
        self.ended_at = Some(ended_at);
        self.duration_seconds = ended_at
            .signed_duration_since(self.started_at)
            .num_seconds()
            .max(0);
        self.completed = completed;
    }

    /// Check if the session has been finalized.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Local calendar date the session started on.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        local_date(self.started_at)
    }

    /// Id of the associated task, if any.
    #[must_use]
    pub fn task_id(&self) -> Option<Uuid> {
        self.task.as_ref().map(|t| t.id)
    }

    /// Get start time in local timezone.
    #[must_use]
    pub fn started_at_local(&self) -> DateTime<Local> {
        self.started_at.with_timezone(&Local)
    }

    /// One-line description for display.
    #[must_use]
    pub fn format_status(&self) -> String {
        let task_info = self
            .task
            .as_ref()
            .map_or_else(String::new, |t| format!(" on \"{}\"", t.name));
        let outcome = match (self.is_finalized(), self.completed) {
            (false, _) => "active",
            (true, true) => "completed",
            (true, false) => "stopped",
        };
        #[allow(clippy::cast_sign_loss)]
        let worked = format_mmss(self.duration_seconds.max(0) as u64);

        format!(
            "{} session{task_info} - {worked} of {} ({outcome})",
            self.kind,
            format_mmss(self.planned_seconds)
        )
    }
}
