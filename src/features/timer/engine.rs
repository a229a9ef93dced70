//! The countdown state machine.
//!
//! A [`Timer`] owns one countdown. While RUNNING a dedicated ticker thread
//! decrements `remaining` once per tick interval and notifies listeners.
//!
//! Every transition (including a tick) changes the state and appends its
//! notifications to a pending queue under a single lock, so the queue order
//! is the order the transitions happened in. Notifications are delivered
//! outside that lock by one thread at a time, which drains the queue:
//! - listeners may call `start`, `pause`, `reset` or `stop` on the timer
//!   they are notified by; the nested transition takes effect at once and its
//!   notifications are delivered after the current one finishes;
//! - a call from any other thread returns once its own notifications have
//!   been delivered;
//! - no tick is queued after a pause/stop/reset notification until the timer
//!   runs again.
//!
//! Each (re)start bumps an epoch; a ticker thread only acts while the epoch
//! it was spawned with is current and the timer is RUNNING.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::format::format_mmss;
use super::kind::TimerKind;
use super::listener::{ListenerId, TimerEvent, TimerListener};
use crate::core::call_isolated;
use crate::error::TimerError;

/// Timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Not counting; `remaining == total`.
    Inactive,
    /// Counting down.
    Running,
    /// Holding the remaining time.
    Paused,
    /// Reached zero. Only `reset()` leaves this state.
    Completed,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "Inactive"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

#[derive(Debug)]
struct Countdown {
    state: TimerState,
    total: u64,
    remaining: u64,
    epoch: u64,
    pending: VecDeque<TimerEvent>,
    /// Thread currently draining `pending`.
    deliverer: Option<ThreadId>,
}

impl Countdown {
    fn is_live(&self, epoch: u64) -> bool {
        self.state == TimerState::Running && self.epoch == epoch
    }
}

type Listeners = Vec<(ListenerId, Arc<dyn TimerListener>)>;

struct Shared {
    kind: TimerKind,
    tick_interval: Duration,
    countdown: Mutex<Countdown>,
    /// Wakes the ticker early when its epoch ends.
    wake: Condvar,
    /// Signalled when a deliverer has emptied the queue.
    idle: Condvar,
    listeners: RwLock<Listeners>,
    next_listener: AtomicU64,
    listener_failures: AtomicU64,
}

/// A countdown timer.
///
/// Cloning yields another handle to the same countdown.
#[derive(Clone)]
pub struct Timer {
    shared: Arc<Shared>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn wait<'a, T>(condvar: &Condvar, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
    condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
}

/// The deadline after one that just fired at `now`.
///
/// Falls back to `now + interval` once the schedule is more than one
/// interval behind, so a slow listener costs at most one immediate tick.
fn next_deadline(deadline: Instant, interval: Duration, now: Instant) -> Instant {
    let next = deadline + interval;
    if now.saturating_duration_since(next) > interval {
        now + interval
    } else {
        next
    }
}

impl Timer {
    /// Create an inactive timer of `total_seconds` ticking once per second.
    #[must_use]
    pub fn new(kind: TimerKind, total_seconds: u64) -> Self {
        Self::with_tick_interval(kind, total_seconds, Duration::from_secs(1))
    }

    /// Create an inactive timer using the kind's default length.
    #[must_use]
    pub fn for_kind(kind: TimerKind) -> Self {
        Self::new(kind, kind.default_seconds())
    }

    /// Create an inactive timer whose ticks are `tick_interval` apart.
    ///
    /// Each tick still counts as one second of countdown.
    #[must_use]
    pub fn with_tick_interval(kind: TimerKind, total_seconds: u64, tick_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                kind,
                tick_interval,
                countdown: Mutex::new(Countdown {
                    state: TimerState::Inactive,
                    total: total_seconds,
                    remaining: total_seconds,
                    epoch: 0,
                    pending: VecDeque::new(),
                    deliverer: None,
                }),
                wake: Condvar::new(),
                idle: Condvar::new(),
                listeners: RwLock::new(Vec::new()),
                next_listener: AtomicU64::new(0),
                listener_failures: AtomicU64::new(0),
            }),
        }
    }

    /// Register a listener. Every registered listener receives every event.
    pub fn add_listener(&self, listener: Arc<dyn TimerListener>) -> ListenerId {
        let id = ListenerId(self.shared.next_listener.fetch_add(1, Ordering::Relaxed));
        self.shared
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .shared
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Start from INACTIVE or resume from PAUSED.
    ///
    /// No-op while RUNNING or COMPLETED; a completed timer must be `reset()`
    /// before it can run again. A zero-length timer completes immediately.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::TickerUnavailable`] if the ticker thread cannot
    /// be spawned. The timer keeps its previous state.
    pub fn start(&self) -> Result<(), TimerError> {
        let mut countdown = lock(&self.shared.countdown);
        let event = match countdown.state {
            TimerState::Inactive => TimerEvent::Started,
            TimerState::Paused => TimerEvent::Resumed,
            TimerState::Running | TimerState::Completed => {
                debug!(kind = %self.shared.kind, state = %countdown.state, "start ignored");
                return Ok(());
            }
        };
        countdown.epoch += 1;

        if countdown.remaining == 0 {
            countdown.state = TimerState::Completed;
            countdown.pending.push_back(event);
            countdown.pending.push_back(TimerEvent::Completed);
            info!(kind = %self.shared.kind, "zero-length timer completed on start");
            self.deliver_pending(countdown);
            return Ok(());
        }

        // The ticker blocks on this lock until the transition is recorded.
        if let Err(e) = self.spawn_ticker(countdown.epoch) {
            warn!(kind = %self.shared.kind, error = %e, "failed to spawn ticker");
            countdown.epoch += 1;
            return Err(TimerError::TickerUnavailable(e));
        }
        countdown.state = TimerState::Running;
        countdown.pending.push_back(event);
        debug!(kind = %self.shared.kind, ?event, remaining = countdown.remaining, "timer running");
        self.deliver_pending(countdown);
        Ok(())
    }

    /// Pause a running timer. No-op in any other state.
    pub fn pause(&self) {
        let mut countdown = lock(&self.shared.countdown);
        if countdown.state != TimerState::Running {
            debug!(kind = %self.shared.kind, state = %countdown.state, "pause ignored");
            return;
        }
        countdown.state = TimerState::Paused;
        countdown.epoch += 1;
        countdown.pending.push_back(TimerEvent::Paused);
        debug!(kind = %self.shared.kind, remaining = countdown.remaining, "timer paused");
        self.shared.wake.notify_all();
        self.deliver_pending(countdown);
    }

    /// Return to INACTIVE with the full countdown restored. Legal from any state.
    ///
    /// Fires `on_timer_reset` followed by a tick carrying the restored value.
    pub fn reset(&self) {
        let mut countdown = lock(&self.shared.countdown);
        countdown.state = TimerState::Inactive;
        countdown.remaining = countdown.total;
        countdown.epoch += 1;
        let total = countdown.total;
        countdown.pending.push_back(TimerEvent::Reset);
        countdown.pending.push_back(TimerEvent::Tick(total));
        debug!(kind = %self.shared.kind, total, "timer reset");
        self.shared.wake.notify_all();
        self.deliver_pending(countdown);
    }

    /// Abandon the countdown and return to INACTIVE. Legal from any state.
    pub fn stop(&self) {
        let mut countdown = lock(&self.shared.countdown);
        debug!(kind = %self.shared.kind, state = %countdown.state, remaining = countdown.remaining, "timer stopped");
        countdown.state = TimerState::Inactive;
        countdown.remaining = countdown.total;
        countdown.epoch += 1;
        countdown.pending.push_back(TimerEvent::Stopped);
        self.shared.wake.notify_all();
        self.deliver_pending(countdown);
    }

    fn spawn_ticker(&self, epoch: u64) -> std::io::Result<()> {
        let timer = self.clone();
        thread::Builder::new()
            .name(format!("pomotrack-ticker-{}", self.shared.kind))
            .spawn(move || timer.run_ticker(epoch))
            .map(|_| ())
    }

    fn run_ticker(&self, epoch: u64) {
        let interval = self.shared.tick_interval;
        let mut deadline = Instant::now() + interval;

        loop {
            if !self.wait_for_deadline(epoch, deadline) || !self.tick(epoch) {
                return;
            }
            deadline = next_deadline(deadline, interval, Instant::now());
        }
    }

    /// Sleep until `deadline`. Returns false as soon as `epoch` is no longer live.
    fn wait_for_deadline(&self, epoch: u64, deadline: Instant) -> bool {
        let mut countdown = lock(&self.shared.countdown);
        loop {
            if !countdown.is_live(epoch) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            countdown = match self.shared.wake.wait_timeout(countdown, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    /// Count down one second for `epoch`. Returns false once ticking must end.
    fn tick(&self, epoch: u64) -> bool {
        let mut countdown = lock(&self.shared.countdown);
        if !countdown.is_live(epoch) {
            return false;
        }
        countdown.remaining = countdown.remaining.saturating_sub(1);
        let remaining = countdown.remaining;
        countdown.pending.push_back(TimerEvent::Tick(remaining));

        let completed = remaining == 0;
        if completed {
            countdown.state = TimerState::Completed;
            countdown.pending.push_back(TimerEvent::Completed);
            info!(kind = %self.shared.kind, total = countdown.total, "timer completed");
        }
        self.deliver_pending(countdown);
        !completed
    }

    /// Deliver queued notifications, in order, without holding the state lock.
    ///
    /// Returns at once when called from inside a listener on the delivering
    /// thread; the outer loop picks up whatever the nested call queued.
    /// Otherwise waits for any other deliverer to finish, then drains.
    fn deliver_pending<'a>(&'a self, mut countdown: MutexGuard<'a, Countdown>) {
        let me = thread::current().id();
        loop {
            let deliverer = countdown.deliverer;
            match deliverer {
                Some(id) if id == me => return,
                Some(_) => countdown = wait(&self.shared.idle, countdown),
                None => break,
            }
        }

        countdown.deliverer = Some(me);
        loop {
            let next = countdown.pending.pop_front();
            let Some(event) = next else {
                break;
            };
            drop(countdown);
            self.emit(event);
            countdown = lock(&self.shared.countdown);
        }
        countdown.deliverer = None;
        drop(countdown);
        self.shared.idle.notify_all();
    }

    fn emit(&self, event: TimerEvent) {
        let listeners: Vec<Arc<dyn TimerListener>> = self
            .shared
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            let delivered = call_isolated("timer listener", || match event {
                TimerEvent::Started => listener.on_timer_started(self),
                TimerEvent::Paused => listener.on_timer_paused(self),
                TimerEvent::Resumed => listener.on_timer_resumed(self),
                TimerEvent::Completed => listener.on_timer_completed(self),
                TimerEvent::Stopped => listener.on_timer_stopped(self),
                TimerEvent::Reset => listener.on_timer_reset(self),
                TimerEvent::Tick(remaining) => listener.on_timer_tick(self, remaining),
            });
            if !delivered {
                self.shared.listener_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        lock(&self.shared.countdown).state
    }

    /// Seconds left on the countdown.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        lock(&self.shared.countdown).remaining
    }

    /// Full length of the countdown in seconds.
    #[must_use]
    pub fn total(&self) -> u64 {
        lock(&self.shared.countdown).total
    }

    /// Seconds counted down so far.
    #[must_use]
    pub fn elapsed(&self) -> u64 {
        let countdown = lock(&self.shared.countdown);
        countdown.total - countdown.remaining
    }

    /// Progress as a fraction in `0.0..=1.0`. A zero-length timer is complete.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        let countdown = lock(&self.shared.countdown);
        if countdown.total == 0 {
            return 1.0;
        }
        1.0 - (countdown.remaining as f64 / countdown.total as f64)
    }

    /// The timer kind.
    #[must_use]
    pub fn kind(&self) -> TimerKind {
        self.shared.kind
    }

    /// Time between ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.shared.tick_interval
    }

    /// Check if the timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    /// Number of listener callbacks that panicked.
    #[must_use]
    pub fn listener_failures(&self) -> u64 {
        self.shared.listener_failures.load(Ordering::Relaxed)
    }

    /// Remaining time as MM:SS.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format_mmss(self.remaining())
    }

    #[cfg(test)]
    fn epoch(&self) -> u64 {
        lock(&self.shared.countdown).epoch
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let countdown = lock(&self.shared.countdown);
        f.debug_struct("Timer")
            .field("kind", &self.shared.kind)
            .field("state", &countdown.state)
            .field("total", &countdown.total)
            .field("remaining", &countdown.remaining)
            .finish_non_exhaustive()
    }
}
