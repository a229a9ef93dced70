//! Timer listener capability interface.

use std::sync::mpsc::Sender;
use std::sync::Mutex;

use super::engine::Timer;

/// Receives timer notifications.
///
/// Every callback has an empty default body; implement only the ones you
/// need. Callbacks run on the thread that drove the transition (the ticker
/// thread for ticks and completion) and no timer lock is held while they
/// run. A callback may query or drive the timer; a transition it causes is
/// delivered to every listener after the current notification. Slow work
/// delays the next tick, so hand it off to another thread (see
/// [`ChannelListener`]).
pub trait TimerListener: Send + Sync {
    /// INACTIVE -> RUNNING.
    fn on_timer_started(&self, _timer: &Timer) {}

    /// RUNNING -> PAUSED.
    fn on_timer_paused(&self, _timer: &Timer) {}

    /// PAUSED -> RUNNING.
    fn on_timer_resumed(&self, _timer: &Timer) {}

    /// The countdown reached zero.
    fn on_timer_completed(&self, _timer: &Timer) {}

    /// The countdown was abandoned.
    fn on_timer_stopped(&self, _timer: &Timer) {}

    /// The countdown was restored to its full length.
    fn on_timer_reset(&self, _timer: &Timer) {}

    /// One second elapsed, or a reset restored the countdown.
    fn on_timer_tick(&self, _timer: &Timer, _seconds_remaining: u64) {}
}

/// Handle returned by [`Timer::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// A timer notification as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// See [`TimerListener::on_timer_started`].
    Started,
    /// See [`TimerListener::on_timer_paused`].
    Paused,
    /// See [`TimerListener::on_timer_resumed`].
    Resumed,
    /// See [`TimerListener::on_timer_completed`].
    Completed,
    /// See [`TimerListener::on_timer_stopped`].
    Stopped,
    /// See [`TimerListener::on_timer_reset`].
    Reset,
    /// See [`TimerListener::on_timer_tick`].
    Tick(u64),
}

/// Forwards every notification into a channel.
///
/// Lets a consumer (a UI loop, a test) receive events on its own thread
/// without holding up the ticker. A disconnected receiver is ignored.
#[derive(Debug)]
pub struct ChannelListener {
    tx: Mutex<Sender<TimerEvent>>,
}

impl ChannelListener {
    /// Wrap the sending half of a channel.
    #[must_use]
    pub const fn new(tx: Sender<TimerEvent>) -> Self {
        Self { tx: Mutex::new(tx) }
    }

    fn send(&self, event: TimerEvent) {
        if let Ok(tx) = self.tx.lock() {
            let _ = tx.send(event);
        }
    }
}

impl TimerListener for ChannelListener {
    fn on_timer_started(&self, _timer: &Timer) {
        self.send(TimerEvent::Started);
    }

    fn on_timer_paused(&self, _timer: &Timer) {
        self.send(TimerEvent::Paused);
    }

    fn on_timer_resumed(&self, _timer: &Timer) {
        self.send(TimerEvent::Resumed);
    }

    fn on_timer_completed(&self, _timer: &Timer) {
        self.send(TimerEvent::Completed);
    }

    fn on_timer_stopped(&self, _timer: &Timer) {
        self.send(TimerEvent::Stopped);
    }

    fn on_timer_reset(&self, _timer: &Timer) {
        self.send(TimerEvent::Reset);
    }

    fn on_timer_tick(&self, _timer: &Timer, seconds_remaining: u64) {
        self.send(TimerEvent::Tick(seconds_remaining));
    }
}
