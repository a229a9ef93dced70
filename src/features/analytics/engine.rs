//! Analytics aggregation.
//!
//! All mappings and running totals live behind one mutex, so every ingest
//! call is atomic with respect to every other ingest and query.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use super::score::productivity_score;
use super::stats::{DailyStats, SessionStats, TaskStats};
use crate::core::Clock;
use crate::features::session::{Session, SessionConsumer};
use crate::features::tasks::Task;

#[derive(Debug, Default)]
struct State {
    sessions: HashMap<Uuid, SessionStats>,
    tasks: HashMap<Uuid, TaskStats>,
    days: BTreeMap<NaiveDate, DailyStats>,
    focus_seconds: i64,
    score: f64,
}

impl State {
    fn recompute_score(&mut self) {
        self.score = productivity_score(self.tasks.len(), self.focus_seconds);
    }

    fn day(&mut self, date: NaiveDate) -> &mut DailyStats {
        self.days
            .entry(date)
            .or_insert_with(|| DailyStats::empty(date))
    }
}

/// Totals across everything ingested so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Completed sessions ingested
    pub sessions: usize,
    /// Completed tasks ingested
    pub completed_tasks: usize,
    /// Sum of session durations, seconds
    pub focus_seconds: i64,
    /// Current productivity score
    pub productivity_score: f64,
    /// Number of days with any recorded activity
    pub active_days: usize,
}

impl AnalyticsSummary {
    /// Focus time in whole minutes.
    #[must_use]
    pub const fn focus_minutes(&self) -> i64 {
        self.focus_seconds / 60
    }
}

/// Running statistics over finalized sessions and completed tasks.
pub struct Analytics {
    clock: Arc<dyn Clock>,
    state: Mutex<State>,
}

impl Analytics {
    /// Create an empty aggregate. Task completions are bucketed under
    /// `clock.today()`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a finalized session. Sessions that did not complete are ignored.
    ///
    /// Returns true if the session was recorded. Ingesting the same id again
    /// replaces the earlier snapshot and its contribution to the totals.
    pub fn ingest_session(&self, session: &Session) -> bool {
        if !session.completed {
            trace!(session = %session.id, "ignoring incomplete session");
            return false;
        }

        let stats = SessionStats::from_session(session);
        let date = session.start_date();
        let mut state = self.state();

        if let Some(previous) = state.sessions.remove(&session.id) {
            state.focus_seconds -= previous.duration_seconds;
            if let Some(old_date) = previous.date() {
                state.day(old_date).remove_session(previous.session_id);
            }
        }

        state.focus_seconds += stats.duration_seconds;
        state.day(date).add_session(stats.clone());
        state.sessions.insert(session.id, stats);
        state.recompute_score();

        debug!(
            session = %session.id,
            %date,
            duration = session.duration_seconds,
            focus_total = state.focus_seconds,
            score = state.score,
            "session ingested"
        );
        true
    }

    /// Record a completed task under today's date. Other statuses are ignored.
    ///
    /// Returns true if the task was recorded.
    pub fn ingest_task_completion(&self, task: &Task) -> bool {
        if !task.is_complete() {
            trace!(task = %task.id, status = ?task.status(), "ignoring unfinished task");
            return false;
        }

        let today = self.clock.today();
        let stats = TaskStats::from_task(task, today);
        let mut state = self.state();

        if let Some(previous) = state.tasks.remove(&task.id) {
            if let Some(old_date) = previous.recorded_on {
                state.day(old_date).remove_task(previous.task_id);
            }
        }

        state.day(today).add_task(stats.clone());
        state.tasks.insert(task.id, stats);
        state.recompute_score();

        debug!(
            task = %task.id,
            date = %today,
            completed_tasks = state.tasks.len(),
            score = state.score,
            "task completion ingested"
        );
        true
    }

    /// Stats for `date`, empty when nothing was recorded.
    #[must_use]
    pub fn get_daily_stats(&self, date: NaiveDate) -> DailyStats {
        self.state()
            .days
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DailyStats::empty(date))
    }

    /// Stats for a task, empty when unknown.
    #[must_use]
    pub fn get_task_stats(&self, task_id: Uuid) -> TaskStats {
        self.state()
            .tasks
            .get(&task_id)
            .cloned()
            .unwrap_or_else(|| TaskStats::empty(task_id))
    }

    /// Stats for a session, empty when unknown.
    #[must_use]
    pub fn get_session_stats(&self, session_id: Uuid) -> SessionStats {
        self.state()
            .sessions
            .get(&session_id)
            .cloned()
            .unwrap_or_else(|| SessionStats::empty(session_id))
    }

    /// One record per date from `from` to `to` inclusive.
    #[must_use]
    pub fn daily_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<DailyStats> {
        let state = self.state();
        let mut days = Vec::new();
        let mut date = from;
        while date <= to {
            days.push(
                state
                    .days
                    .get(&date)
                    .cloned()
                    .unwrap_or_else(|| DailyStats::empty(date)),
            );
            date += Duration::days(1);
        }
        days
    }

    /// Sum of all ingested session durations, seconds.
    #[must_use]
    pub fn focus_time_total(&self) -> i64 {
        self.state().focus_seconds
    }

    /// Current productivity score.
    #[must_use]
    pub fn productivity_score(&self) -> f64 {
        self.state().score
    }

    /// Number of distinct completed tasks ingested.
    #[must_use]
    pub fn completed_task_count(&self) -> usize {
        self.state().tasks.len()
    }

    /// Number of distinct completed sessions ingested.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.state().sessions.len()
    }

    /// Snapshot of the running totals.
    #[must_use]
    pub fn summary(&self) -> AnalyticsSummary {
        let state = self.state();
        AnalyticsSummary {
            sessions: state.sessions.len(),
            completed_tasks: state.tasks.len(),
            focus_seconds: state.focus_seconds,
            productivity_score: state.score,
            active_days: state.days.values().filter(|d| !d.is_empty()).count(),
        }
    }
}

impl std::fmt::Debug for Analytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analytics")
            .field("summary", &self.summary())
            .finish_non_exhaustive()
    }
}

impl SessionConsumer for Analytics {
    fn on_session_finished(&self, session: &Session) {
        self.ingest_session(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::features::timer::TimerKind;
    use chrono::{DateTime, TimeZone, Utc};
    use std::thread;

    fn noon(day: u32) -> DateTime<Utc> {
        // Noon UTC stays on the same calendar date in every common timezone.
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn analytics() -> Analytics {
        Analytics::new(Arc::new(ManualClock::new(noon(3))))
    }

    fn session(start: DateTime<Utc>, seconds: i64, completed: bool) -> Session {
        let mut session = Session::begin(TimerKind::Work, 1500, None, start);
        session.finish(start + Duration::seconds(seconds), completed);
        session
    }

    fn done(name: &str) -> Task {
        let mut task = Task::new(name);
        task.complete();
        task
    }

    #[test]
    fn test_two_sessions_sum_to_focus_total() {
        let analytics = analytics();
        let a = session(noon(3), 1500, true);
        let b = session(noon(3) + Duration::minutes(30), 300, true);

        assert!(analytics.ingest_session(&a));
        assert!(analytics.ingest_session(&b));

        assert_eq!(analytics.focus_time_total(), 1800);
        let day = analytics.get_daily_stats(a.start_date());
        assert_eq!(day.focus_seconds, 1800);
        assert_eq!(day.sessions.len(), 2);
    }

    #[test]
    fn test_three_tasks_ten_minutes_scores_thirty() {
        let analytics = analytics();
        analytics.ingest_session(&session(noon(3), 600, true));
        for name in ["a", "b", "c"] {
            analytics.ingest_task_completion(&done(name));
        }

        assert_eq!(analytics.completed_task_count(), 3);
        assert!((analytics.productivity_score() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_zero_without_tasks_or_focus() {
        let analytics = analytics();
        analytics.ingest_session(&session(noon(3), 600, true));
        assert_eq!(analytics.productivity_score(), 0.0);

        let analytics = self::analytics();
        analytics.ingest_task_completion(&done("a"));
        assert_eq!(analytics.productivity_score(), 0.0);
    }

    #[test]
    fn test_score_capped() {
        let analytics = analytics();
        analytics.ingest_session(&session(noon(3), 60, true));
        for name in ["a", "b", "c"] {
            analytics.ingest_task_completion(&done(name));
        }
        assert_eq!(analytics.productivity_score(), 100.0);
    }

    #[test]
    fn test_missing_records_are_empty() {
        let analytics = analytics();
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let id = Uuid::new_v4();

        let day = analytics.get_daily_stats(date);
        assert_eq!(day.date, date);
        assert!(day.is_empty());
        assert_eq!(day.focus_seconds, 0);
        assert!(analytics.get_session_stats(id).is_empty());
        assert!(analytics.get_task_stats(id).is_empty());
    }

    #[test]
    fn test_incomplete_inputs_ignored() {
        let analytics = analytics();
        assert!(!analytics.ingest_session(&session(noon(3), 600, false)));
        assert!(!analytics.ingest_task_completion(&Task::new("open")));

        let summary = analytics.summary();
        assert_eq!(summary.sessions, 0);
        assert_eq!(summary.completed_tasks, 0);
        assert_eq!(summary.focus_seconds, 0);
    }

    #[test]
    fn test_reingest_session_overwrites() {
        let analytics = analytics();
        let mut s = session(noon(3), 600, true);
        analytics.ingest_session(&s);

        s.finish(s.started_at + Duration::seconds(900), true);
        analytics.ingest_session(&s);

        assert_eq!(analytics.session_count(), 1);
        assert_eq!(analytics.focus_time_total(), 900);
        let day = analytics.get_daily_stats(s.start_date());
        assert_eq!(day.sessions.len(), 1);
        assert_eq!(day.focus_seconds, 900);
        assert_eq!(analytics.get_session_stats(s.id).duration_seconds, 900);
    }

    #[test]
    fn test_reingest_task_moves_bucket() {
        let clock = Arc::new(ManualClock::new(noon(3)));
        let analytics = Analytics::new(clock.clone());
        let task = done("report");

        analytics.ingest_task_completion(&task);
        let first = clock.today();
        clock.advance(Duration::days(1));
        analytics.ingest_task_completion(&task);

        assert_eq!(analytics.completed_task_count(), 1);
        assert!(analytics.get_daily_stats(first).tasks.is_empty());
        assert_eq!(analytics.get_daily_stats(clock.today()).tasks.len(), 1);
        assert_eq!(analytics.get_task_stats(task.id).recorded_on, Some(clock.today()));
    }

    #[test]
    fn test_sessions_bucket_by_start_date() {
        let analytics = analytics();
        let a = session(noon(3), 600, true);
        let b = session(noon(4), 300, true);
        analytics.ingest_session(&a);
        analytics.ingest_session(&b);

        assert_eq!(analytics.get_daily_stats(a.start_date()).focus_seconds, 600);
        assert_eq!(analytics.get_daily_stats(b.start_date()).focus_seconds, 300);

        let range = analytics.daily_range(a.start_date(), a.start_date() + Duration::days(2));
        assert_eq!(range.len(), 3);
        assert_eq!(range[1].focus_seconds, 300);
        assert!(range[2].is_empty());
        assert_eq!(analytics.summary().active_days, 2);
    }

    #[test]
    fn test_consumer_ingests() {
        let analytics = analytics();
        let s = session(noon(3), 120, true);
        analytics.on_session_finished(&s);
        assert_eq!(analytics.get_session_stats(s.id).duration_seconds, 120);
    }

    #[test]
    fn test_concurrent_ingest_keeps_totals() {
        let analytics = Arc::new(analytics());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let analytics = Arc::clone(&analytics);
                thread::spawn(move || {
                    for j in 0..25 {
                        let start = noon(3 + (i % 3)) + Duration::minutes(j);
                        analytics.ingest_session(&session(start, 60, true));
                        analytics.ingest_task_completion(&done("t"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let summary = analytics.summary();
        assert_eq!(summary.sessions, 200);
        assert_eq!(summary.completed_tasks, 200);
        assert_eq!(summary.focus_seconds, 200 * 60);

        let first = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let bucket_sum: i64 = analytics
            .daily_range(first, first + Duration::days(10))
            .iter()
            .map(|d| d.focus_seconds)
            .sum();
        assert_eq!(bucket_sum, summary.focus_seconds);
    }
}
