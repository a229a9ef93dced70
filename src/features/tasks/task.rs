//! Task model.
//!
//! A task's lifecycle is a single [`TaskStatus`] value; every `is_*`
//! predicate derives from it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task status. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet begun
    #[default]
    NotStarted,
    /// Being worked on
    InProgress,
    /// Deferred
    Postponed,
    /// Dropped
    Canceled,
    /// Done
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "Not Started"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Postponed => write!(f, "Postponed"),
            Self::Canceled => write!(f, "Canceled"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority
    Low,
    /// Normal priority
    #[default]
    Medium,
    /// High priority
    High,
    /// Drop everything
    Urgent,
}

impl Priority {
    /// Parse a priority from user input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "l" => Some(Self::Low),
            "medium" | "med" | "m" => Some(Self::Medium),
            "high" | "h" => Some(Self::High),
            "urgent" | "u" | "!" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// A unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: Uuid,
    /// Short name
    pub name: String,
    /// Longer description
    pub description: String,
    /// Lifecycle status
    status: TaskStatus,
    /// Priority
    pub priority: Priority,
    /// Free-form category
    pub category: Option<String>,
    /// When the task was created
    pub created_at: DateTime<Utc>,
    /// When the task last changed
    modified_at: DateTime<Utc>,
    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// Create a not-started task.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::created_at(name, Utc::now())
    }

    /// Create a not-started task with an explicit creation time.
    #[must_use]
    pub fn created_at(name: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            status: TaskStatus::NotStarted,
            priority: Priority::default(),
            category: None,
            created_at: at,
            modified_at: at,
            due_date: None,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// When the task last changed.
    #[must_use]
    pub const fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    fn touch(&mut self) {
        // Never move backwards, even if the wall clock does.
        self.modified_at = Utc::now().max(self.modified_at);
    }

    /// Replace the status.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.touch();
    }

    /// Mark as in progress.
    pub fn start(&mut self) {
        self.set_status(TaskStatus::InProgress);
    }

    /// Mark as completed.
    pub fn complete(&mut self) {
        self.set_status(TaskStatus::Completed);
    }

    /// Mark as postponed.
    pub fn postpone(&mut self) {
        self.set_status(TaskStatus::Postponed);
    }

    /// Mark as canceled.
    pub fn cancel(&mut self) {
        self.set_status(TaskStatus::Canceled);
    }

    /// Rename the task.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Replace the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    /// Change the priority.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    /// Change the category.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
        self.touch();
    }

    /// Change the due date.
    pub fn set_due_date(&mut self, due: Option<NaiveDate>) {
        self.due_date = due;
        self.touch();
    }

    /// Check if the task is completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Check if the task is in progress.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == TaskStatus::InProgress
    }

    /// Check if the task has not been started.
    #[must_use]
    pub fn is_not_started(&self) -> bool {
        self.status == TaskStatus::NotStarted
    }

    /// Check if the task is postponed.
    #[must_use]
    pub fn is_postponed(&self) -> bool {
        self.status == TaskStatus::Postponed
    }

    /// Check if the task is canceled.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.status == TaskStatus::Canceled
    }

    /// Check if the task is past due and still open.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < today)
            && !matches!(self.status, TaskStatus::Completed | TaskStatus::Canceled)
    }

    /// The lightweight reference a session keeps.
    #[must_use]
    pub fn to_ref(&self) -> TaskRef {
        TaskRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// A non-owning reference to a task: id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskRef {
    /// Task id
    pub id: Uuid,
    /// Task name at the time the reference was taken
    pub name: String,
}
