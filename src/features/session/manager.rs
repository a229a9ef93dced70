//! Session manager.
//!
//! Owns at most one active session and the timer driving it. The timer's
//! completion notification finalizes the session as completed; an explicit
//! stop finalizes it as not completed.
//!
//! The manager never holds its own lock while calling into the timer, so
//! a completion arriving on the ticker thread cannot deadlock against a
//! caller stopping the session.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::record::Session;
use crate::config::TimerDurations;
use crate::core::{call_isolated, Clock};
use crate::error::{SessionError, TrackerError};
use crate::features::tasks::TaskRef;
use crate::features::timer::{next_kind, Timer, TimerKind, TimerListener, TimerState};

/// Receives every finalized session.
pub trait SessionConsumer: Send + Sync {
    /// A session was finalized.
    fn on_session_finished(&self, session: &Session);
}

struct Active {
    session: Session,
    timer: Timer,
}

struct Inner {
    clock: Arc<dyn Clock>,
    durations: TimerDurations,
    tick_interval: Duration,
    active: Mutex<Option<Active>>,
    consumers: RwLock<Vec<Arc<dyn SessionConsumer>>>,
    completed_work: AtomicU32,
    last_finished: Mutex<Option<TimerKind>>,
    consumer_failures: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    fn finalize(&self, mut active: Active, completed: bool) -> Session {
        if active.timer.state() != TimerState::Completed {
            active.timer.stop();
        }
        active.session.finish(self.clock.now(), completed);
        let session = active.session;

        if completed {
            if !session.kind.is_break() {
                self.completed_work.fetch_add(1, Ordering::Relaxed);
            }
            *lock(&self.last_finished) = Some(session.kind);
        }

        info!(
            session = %session.id,
            kind = %session.kind,
            duration = session.duration_seconds,
            completed,
            "session finalized"
        );

        let consumers: Vec<Arc<dyn SessionConsumer>> = self
            .consumers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for consumer in consumers {
            if !call_isolated("session consumer", || consumer.on_session_finished(&session)) {
                self.consumer_failures.fetch_add(1, Ordering::Relaxed);
            }
        }

        session
    }

    fn take_if(&self, id: Uuid) -> Option<Active> {
        let mut active = lock(&self.active);
        if active.as_ref().is_some_and(|a| a.session.id == id) {
            active.take()
        } else {
            None
        }
    }
}

/// Finalizes its session when the timer completes.
struct CompletionWatch {
    manager: Weak<Inner>,
    session_id: Uuid,
}

impl TimerListener for CompletionWatch {
    fn on_timer_completed(&self, _timer: &Timer) {
        let Some(inner) = self.manager.upgrade() else {
            return;
        };
        // Already finalized by an explicit stop if this finds nothing.
        if let Some(active) = inner.take_if(self.session_id) {
            inner.finalize(active, true);
        }
    }
}

/// Runs focus sessions one at a time.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Create a manager whose timers tick once per second.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, durations: TimerDurations) -> Self {
        Self::with_tick_interval(clock, durations, Duration::from_secs(1))
    }

    /// Create a manager whose timers tick every `tick_interval`.
    #[must_use]
    pub fn with_tick_interval(
        clock: Arc<dyn Clock>,
        durations: TimerDurations,
        tick_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                clock,
                durations,
                tick_interval,
                active: Mutex::new(None),
                consumers: RwLock::new(Vec::new()),
                completed_work: AtomicU32::new(0),
                last_finished: Mutex::new(None),
                consumer_failures: AtomicU64::new(0),
            }),
        }
    }

    /// Register a consumer of finalized sessions.
    pub fn add_consumer(&self, consumer: Arc<dyn SessionConsumer>) {
        self.inner
            .consumers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(consumer);
    }

    /// Start a session on a fresh timer.
    ///
    /// `duration` overrides the configured length for `kind`, in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyActive`] if a session is running; the
    /// running session is left untouched. Returns a timer error if the
    /// ticker cannot be started.
    pub fn start_session(
        &self,
        kind: TimerKind,
        duration: Option<u64>,
        task: Option<TaskRef>,
    ) -> Result<Uuid, TrackerError> {
        let (timer, id) = {
            let mut active = lock(&self.inner.active);
            if let Some(current) = active.as_ref() {
                warn!(active = %current.session.id, "start rejected: session already active");
                return Err(SessionError::AlreadyActive {
                    id: current.session.id,
                }
                .into());
            }

            let planned = duration.unwrap_or_else(|| self.inner.durations.seconds_for(kind));
            let timer = Timer::with_tick_interval(kind, planned, self.inner.tick_interval);
            let session = Session::begin(kind, planned, task, self.inner.clock.now());

            timer.add_listener(Arc::new(CompletionWatch {
                manager: Arc::downgrade(&self.inner),
                session_id: session.id,
            }));

            let id = session.id;
            debug!(session = %id, %kind, planned, "session opened");
            *active = Some(Active {
                session,
                timer: timer.clone(),
            });
            (timer, id)
        };

        if let Err(e) = timer.start() {
            self.inner.take_if(id);
            return Err(e.into());
        }
        Ok(id)
    }

    /// Pause the active session's timer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveSession`] if nothing is running.
    pub fn pause(&self) -> Result<(), SessionError> {
        self.active_timer()
            .ok_or(SessionError::NoActiveSession)
            .map(|timer| timer.pause())
    }

    /// Resume the active session's timer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveSession`] if nothing is running, or a
    /// timer error if the ticker cannot be restarted.
    pub fn resume(&self) -> Result<(), TrackerError> {
        let timer = self.active_timer().ok_or(SessionError::NoActiveSession)?;
        timer.start()?;
        Ok(())
    }

    /// Stop the active session early. It is finalized with `completed = false`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveSession`] if nothing is running.
    pub fn stop_session(&self) -> Result<Session, SessionError> {
        self.end_current_session(false)
    }

    /// Finalize the active session and hand it to every consumer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveSession`] if nothing is running.
    pub fn end_current_session(&self, completed: bool) -> Result<Session, SessionError> {
        let active = lock(&self.inner.active)
            .take()
            .ok_or(SessionError::NoActiveSession)?;
        Ok(self.inner.finalize(active, completed))
    }

    /// Snapshot of the active session.
    #[must_use]
    pub fn active_session(&self) -> Option<Session> {
        lock(&self.inner.active).as_ref().map(|a| a.session.clone())
    }

    /// Handle to the active session's timer, for attaching listeners.
    #[must_use]
    pub fn timer(&self) -> Option<Timer> {
        self.active_timer()
    }

    /// Check if a session is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        lock(&self.inner.active).is_some()
    }

    /// Work sessions that ran to completion.
    #[must_use]
    pub fn completed_work_sessions(&self) -> u32 {
        self.inner.completed_work.load(Ordering::Relaxed)
    }

    /// The kind the pomodoro cycle suggests next.
    #[must_use]
    pub fn suggested_next_kind(&self) -> TimerKind {
        let last = *lock(&self.inner.last_finished);
        last.map_or(TimerKind::Work, |kind| {
            next_kind(
                kind,
                self.completed_work_sessions(),
                self.inner.durations.sessions_until_long_break,
            )
        })
    }

    /// Number of consumer callbacks that panicked.
    #[must_use]
    pub fn consumer_failures(&self) -> u64 {
        self.inner.consumer_failures.load(Ordering::Relaxed)
    }

    /// The configured durations.
    #[must_use]
    pub fn durations(&self) -> TimerDurations {
        self.inner.durations
    }

    fn active_timer(&self) -> Option<Timer> {
        lock(&self.inner.active).as_ref().map(|a| a.timer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::features::tasks::Task;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
    use std::sync::mpsc::{self, Sender};

    const FAST: Duration = Duration::from_millis(5);
    const NEVER: Duration = Duration::from_secs(3600);
    const WAIT: Duration = Duration::from_secs(5);

    struct Collector(Mutex<Sender<Session>>);

    impl SessionConsumer for Collector {
        fn on_session_finished(&self, session: &Session) {
            let _ = self.0.lock().unwrap().send(session.clone());
        }
    }

    struct Faulty;

    impl SessionConsumer for Faulty {
        fn on_session_finished(&self, _session: &Session) {
            panic!("consumer failure");
        }
    }

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
    }

    fn manager(interval: Duration) -> (SessionManager, Arc<ManualClock>, mpsc::Receiver<Session>) {
        let clock = Arc::new(ManualClock::new(start_time()));
        let manager =
            SessionManager::with_tick_interval(clock.clone(), TimerDurations::default(), interval);
        let (tx, rx) = mpsc::channel();
        manager.add_consumer(Arc::new(Collector(Mutex::new(tx))));
        (manager, clock, rx)
    }

    #[test]
    fn test_start_session_runs_timer() {
        let (manager, _clock, _rx) = manager(NEVER);
        let task = Task::new("Write tests");
        let id = manager
            .start_session(TimerKind::Work, None, Some(task.to_ref()))
            .unwrap();

        let session = manager.active_session().unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.started_at, start_time());
        assert_eq!(session.planned_seconds, 1500);
        assert_eq!(session.task_id(), Some(task.id));

        let timer = manager.timer().unwrap();
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.total(), 1500);
    }

    #[test]
    fn test_second_start_is_rejected() {
        let (manager, _clock, _rx) = manager(NEVER);
        let first = manager.start_session(TimerKind::Work, None, None).unwrap();

        let err = manager
            .start_session(TimerKind::ShortBreak, None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Session(SessionError::AlreadyActive { id }) if id == first
        ));

        let session = manager.active_session().unwrap();
        assert_eq!(session.id, first);
        assert_eq!(session.kind, TimerKind::Work);
        assert_eq!(manager.timer().unwrap().state(), TimerState::Running);
    }

    #[test]
    fn test_stop_session_finalizes_incomplete() {
        let (manager, clock, rx) = manager(NEVER);
        manager.start_session(TimerKind::Work, None, None).unwrap();
        let timer = manager.timer().unwrap();

        clock.advance(ChronoDuration::seconds(300));
        let session = manager.stop_session().unwrap();

        assert!(!session.completed);
        assert_eq!(session.ended_at, Some(start_time() + ChronoDuration::seconds(300)));
        assert_eq!(session.duration_seconds, 300);
        assert_eq!(timer.state(), TimerState::Inactive);
        assert!(!manager.is_active());
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), session);
        assert_eq!(manager.completed_work_sessions(), 0);
    }

    #[test]
    fn test_stop_without_session() {
        let (manager, _clock, _rx) = manager(NEVER);
        assert!(matches!(
            manager.stop_session(),
            Err(SessionError::NoActiveSession)
        ));
        assert!(matches!(manager.pause(), Err(SessionError::NoActiveSession)));
    }

    #[test]
    fn test_natural_completion_finalizes_completed() {
        let (manager, _clock, rx) = manager(FAST);
        let id = manager.start_session(TimerKind::Work, Some(3), None).unwrap();

        let session = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(session.id, id);
        assert!(session.completed);
        assert!(session.is_finalized());
        assert_eq!(session.planned_seconds, 3);
        assert!(!manager.is_active());
        assert_eq!(manager.completed_work_sessions(), 1);
        assert_eq!(manager.suggested_next_kind(), TimerKind::ShortBreak);
    }

    #[test]
    fn test_pause_and_resume() {
        let (manager, _clock, _rx) = manager(NEVER);
        manager.start_session(TimerKind::Work, None, None).unwrap();
        let timer = manager.timer().unwrap();

        manager.pause().unwrap();
        assert_eq!(timer.state(), TimerState::Paused);

        manager.resume().unwrap();
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn test_new_session_after_previous_ends() {
        let (manager, _clock, _rx) = manager(NEVER);
        let first = manager.start_session(TimerKind::Work, None, None).unwrap();
        manager.stop_session().unwrap();

        let second = manager.start_session(TimerKind::Work, None, None).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_failing_consumer_is_isolated() {
        let (manager, _clock, rx) = manager(NEVER);
        manager.add_consumer(Arc::new(Faulty));
        manager.start_session(TimerKind::Work, None, None).unwrap();

        let session = manager.stop_session().unwrap();
        assert_eq!(rx.recv_timeout(WAIT).unwrap().id, session.id);
        assert_eq!(manager.consumer_failures(), 1);
    }

    #[test]
    fn test_zero_length_session_completes_immediately() {
        let (manager, _clock, rx) = manager(NEVER);
        manager.start_session(TimerKind::Custom, Some(0), None).unwrap();

        let session = rx.recv_timeout(WAIT).unwrap();
        assert!(session.completed);
        assert!(!manager.is_active());
    }

    #[test]
    fn test_long_break_after_cycle() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let durations = TimerDurations {
            sessions_until_long_break: 2,
            ..TimerDurations::default()
        };
        let manager = SessionManager::with_tick_interval(clock, durations, NEVER);

        assert_eq!(manager.suggested_next_kind(), TimerKind::Work);
        for _ in 0..2 {
            manager.start_session(TimerKind::Work, None, None).unwrap();
            manager.end_current_session(true).unwrap();
        }
        assert_eq!(manager.completed_work_sessions(), 2);
        assert_eq!(manager.suggested_next_kind(), TimerKind::LongBreak);
    }
}
