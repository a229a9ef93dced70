//! Statistics records.
//!
//! Snapshots are taken at ingestion time. Every query returns one of these,
//! possibly empty, so callers never handle a missing record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::local_date;
use crate::features::session::Session;
use crate::features::tasks::{Priority, Task, TaskStatus};
use crate::features::timer::TimerKind;

/// Snapshot of one finalized session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session id
    pub session_id: Uuid,
    /// Timer kind (None for an empty record)
    pub kind: Option<TimerKind>,
    /// Associated task
    pub task_id: Option<Uuid>,
    /// When the session started
    pub started_at: Option<DateTime<Utc>>,
    /// When the session ended
    pub ended_at: Option<DateTime<Utc>>,
    /// Wall-clock length in seconds
    pub duration_seconds: i64,
    /// True if the countdown ran to zero
    pub completed: bool,
}

impl SessionStats {
    /// The record returned for an unknown session.
    #[must_use]
    pub fn empty(session_id: Uuid) -> Self {
        Self {
            session_id,
            ..Self::default()
        }
    }

    /// Snapshot a session.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.id,
            kind: Some(session.kind),
            task_id: session.task_id(),
            started_at: Some(session.started_at),
            ended_at: session.ended_at,
            duration_seconds: session.duration_seconds,
            completed: session.completed,
        }
    }

    /// Check if this is an empty record.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.started_at.is_none()
    }

    /// Local calendar date the session started on.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.started_at.map(local_date)
    }
}

/// Snapshot of one completed task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStats {
    /// Task id
    pub task_id: Uuid,
    /// Task name
    pub name: String,
    /// Status at ingestion
    pub status: TaskStatus,
    /// Priority at ingestion
    pub priority: Priority,
    /// Category at ingestion
    pub category: Option<String>,
    /// When the task was created
    pub created_at: Option<DateTime<Utc>>,
    /// When the task was completed (its last modification)
    pub completed_at: Option<DateTime<Utc>>,
    /// Day bucket the completion was recorded in
    pub recorded_on: Option<NaiveDate>,
}

impl TaskStats {
    /// The record returned for an unknown task.
    #[must_use]
    pub fn empty(task_id: Uuid) -> Self {
        Self {
            task_id,
            ..Self::default()
        }
    }

    /// Snapshot a task, recording it on `date`.
    #[must_use]
    pub fn from_task(task: &Task, date: NaiveDate) -> Self {
        Self {
            task_id: task.id,
            name: task.name.clone(),
            status: task.status(),
            priority: task.priority,
            category: task.category.clone(),
            created_at: Some(task.created_at),
            completed_at: Some(task.modified_at()),
            recorded_on: Some(date),
        }
    }

    /// Check if this is an empty record.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.recorded_on.is_none()
    }
}

/// Everything recorded for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// The date
    pub date: NaiveDate,
    /// Completed sessions that started on this date
    pub sessions: Vec<SessionStats>,
    /// Tasks completed on this date
    pub tasks: Vec<TaskStats>,
    /// Sum of `duration_seconds` over `sessions`
    pub focus_seconds: i64,
}

impl DailyStats {
    /// An empty record for `date`.
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            sessions: Vec::new(),
            tasks: Vec::new(),
            focus_seconds: 0,
        }
    }

    /// Add a session unless it is already recorded. Returns true if added.
    pub fn add_session(&mut self, stats: SessionStats) -> bool {
        if self.sessions.iter().any(|s| s.session_id == stats.session_id) {
            return false;
        }
        self.focus_seconds += stats.duration_seconds;
        self.sessions.push(stats);
        true
    }

    /// Remove a session, taking its duration back out of the total.
    pub fn remove_session(&mut self, session_id: Uuid) -> Option<SessionStats> {
        let index = self.sessions.iter().position(|s| s.session_id == session_id)?;
        let removed = self.sessions.remove(index);
        self.focus_seconds -= removed.duration_seconds;
        Some(removed)
    }

    /// Add a task unless it is already recorded. Returns true if added.
    pub fn add_task(&mut self, stats: TaskStats) -> bool {
        if self.tasks.iter().any(|t| t.task_id == stats.task_id) {
            return false;
        }
        self.tasks.push(stats);
        true
    }

    /// Remove a task.
    pub fn remove_task(&mut self, task_id: Uuid) -> Option<TaskStats> {
        let index = self.tasks.iter().position(|t| t.task_id == task_id)?;
        Some(self.tasks.remove(index))
    }

    /// Focus time in whole minutes.
    #[must_use]
    pub const fn focus_minutes(&self) -> i64 {
        self.focus_seconds / 60
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.tasks.is_empty()
    }
}
