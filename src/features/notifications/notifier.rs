//! Session and task notifications.
//!
//! [`SessionNotifier`] builds a [`Notification`] for each finished session
//! or completed task and hands it to a [`Notifier`], which decides how it is
//! shown: a tracing event ([`LogNotifier`]) or a colored terminal line
//! ([`TerminalNotifier`]).

use std::fmt;
use std::sync::Arc;

use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::NotificationConfig;
use crate::features::session::{Session, SessionConsumer};
use crate::features::tasks::Task;
use crate::features::timer::format_duration;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A work session ran to completion.
    FocusComplete,
    /// A break ran to completion.
    BreakComplete,
    /// A session was stopped before its countdown finished.
    SessionAbandoned,
    /// A task was marked complete.
    TaskCompleted,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FocusComplete => "focus_complete",
            Self::BreakComplete => "break_complete",
            Self::SessionAbandoned => "session_abandoned",
            Self::TaskCompleted => "task_completed",
        };
        write!(f, "{name}")
    }
}

/// A notification and its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// What the notification is about.
    pub kind: NotificationKind,
    /// Short headline, e.g. "Focus session complete".
    pub title: String,
    /// Detail line: time worked and the task, if any.
    pub body: String,
}

impl Notification {
    /// Describe a finalized session.
    #[must_use]
    pub fn for_session(session: &Session) -> Self {
        #[allow(clippy::cast_sign_loss)]
        let worked = format_duration(session.duration_seconds.max(0) as u64);
        let task = session
            .task
            .as_ref()
            .map_or_else(String::new, |t| format!(" on {}", t.name));

        if !session.completed {
            return Self {
                kind: NotificationKind::SessionAbandoned,
                title: format!("{} stopped", session.kind),
                body: format!("Stopped after {worked}{task}"),
            };
        }
        if session.kind.is_break() {
            Self {
                kind: NotificationKind::BreakComplete,
                title: "Break over".to_string(),
                body: format!("{} finished after {worked}", session.kind),
            }
        } else {
            Self {
                kind: NotificationKind::FocusComplete,
                title: "Focus session complete".to_string(),
                body: format!("Focused for {worked}{task}"),
            }
        }
    }

    /// Describe a completed task.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        Self {
            kind: NotificationKind::TaskCompleted,
            title: "Task completed".to_string(),
            body: task.name.clone(),
        }
    }
}

/// Delivers notifications.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show one notification. Delivery failures are the notifier's to handle.
    fn notify(&self, notification: &Notification);
}

/// Emits notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        info!(
            kind = %notification.kind,
            title = %notification.title,
            body = %notification.body,
            "notification"
        );
    }
}

/// Prints notifications to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        let title = match notification.kind {
            NotificationKind::FocusComplete | NotificationKind::TaskCompleted => {
                notification.title.green().bold()
            }
            NotificationKind::BreakComplete => notification.title.cyan().bold(),
            NotificationKind::SessionAbandoned => notification.title.yellow().bold(),
        };
        println!("{} {title}: {}", "●".dimmed(), notification.body);
    }
}

/// Turns finished sessions and completed tasks into notifications.
pub struct SessionNotifier {
    notifier: Arc<dyn Notifier>,
    config: NotificationConfig,
}

impl SessionNotifier {
    /// Deliver through `notifier`, filtered by `config`.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, config: NotificationConfig) -> Self {
        Self { notifier, config }
    }

    /// Notify about a completed task. Unfinished tasks are ignored.
    pub fn notify_task(&self, task: &Task) {
        if self.config.enabled && task.is_complete() {
            self.notifier.notify(&Notification::for_task(task));
        }
    }

    fn wants(&self, notification: &Notification) -> bool {
        self.config.enabled
            && (notification.kind != NotificationKind::SessionAbandoned
                || self.config.notify_abandoned)
    }
}

impl SessionConsumer for SessionNotifier {
    fn on_session_finished(&self, session: &Session) {
        let notification = Notification::for_session(session);
        if self.wants(&notification) {
            self.notifier.notify(&notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::timer::TimerKind;
    use chrono::{Duration, TimeZone, Utc};
    use mockall::predicate::function;

    fn session(kind: TimerKind, completed: bool) -> Session {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let mut session = Session::begin(kind, 1500, None, start);
        session.finish(start + Duration::minutes(25), completed);
        session
    }

    fn config(enabled: bool, notify_abandoned: bool) -> NotificationConfig {
        NotificationConfig {
            enabled,
            notify_abandoned,
        }
    }

    #[test]
    fn test_kind_for_session() {
        assert_eq!(
            Notification::for_session(&session(TimerKind::Work, true)).kind,
            NotificationKind::FocusComplete
        );
        assert_eq!(
            Notification::for_session(&session(TimerKind::LongBreak, true)).kind,
            NotificationKind::BreakComplete
        );
        assert_eq!(
            Notification::for_session(&session(TimerKind::Work, false)).kind,
            NotificationKind::SessionAbandoned
        );
    }

    #[test]
    fn test_focus_body() {
        let n = Notification::for_session(&session(TimerKind::Work, true));
        assert_eq!(n.body, "Focused for 25 minutes");
    }

    #[test]
    fn test_completed_session_notifies() {
        let mut mock = MockNotifier::new();
        mock.expect_notify()
            .with(function(|n: &Notification| {
                n.kind == NotificationKind::FocusComplete
            }))
            .times(1)
            .return_const(());

        let consumer = SessionNotifier::new(Arc::new(mock), config(true, false));
        consumer.on_session_finished(&session(TimerKind::Work, true));
    }

    #[test]
    fn test_abandoned_respects_config() {
        let mut mock = MockNotifier::new();
        mock.expect_notify().times(0);
        let consumer = SessionNotifier::new(Arc::new(mock), config(true, false));
        consumer.on_session_finished(&session(TimerKind::Work, false));

        let mut mock = MockNotifier::new();
        mock.expect_notify().times(1).return_const(());
        let consumer = SessionNotifier::new(Arc::new(mock), config(true, true));
        consumer.on_session_finished(&session(TimerKind::Work, false));
    }

    #[test]
    fn test_disabled_is_silent() {
        let mut mock = MockNotifier::new();
        mock.expect_notify().times(0);
        let consumer = SessionNotifier::new(Arc::new(mock), config(false, true));
        consumer.on_session_finished(&session(TimerKind::Work, true));

        let mut task = Task::new("done");
        task.complete();
        consumer.notify_task(&task);
    }

    #[test]
    fn test_task_completion_notifies() {
        let mut mock = MockNotifier::new();
        mock.expect_notify()
            .with(function(|n: &Notification| {
                n.kind == NotificationKind::TaskCompleted && n.body == "Ship it"
            }))
            .times(1)
            .return_const(());
        let consumer = SessionNotifier::new(Arc::new(mock), config(true, false));

        let mut task = Task::new("Ship it");
        consumer.notify_task(&task);
        task.complete();
        consumer.notify_task(&task);
    }
}
