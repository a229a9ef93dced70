//! Foreground session commands.
//!
//! Runs sessions through a [`SessionManager`] with [`Analytics`] and a
//! [`SessionNotifier`] registered as consumers, printing the countdown from
//! the timer's event channel.

use std::io::Write;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use crate::cli::args::{CycleArgs, OutputFormat, RunArgs};
use crate::config::{Config, PreferenceStore, TimerDurations};
use crate::core::{Clock, SystemClock};
use crate::error::TrackerError;
use crate::features::analytics::Analytics;
use crate::features::notifications::{LogNotifier, Notifier, SessionNotifier, TerminalNotifier};
use crate::features::session::{Session, SessionConsumer, SessionManager};
use crate::features::tasks::{Task, TaskRef};
use crate::features::timer::{parse_duration, ChannelListener, Timer, TimerEvent, TimerKind};
use crate::output::{format_report, format_tick_line};

const POLL: Duration = Duration::from_millis(50);

/// Forwards finished sessions to the command's thread.
struct Finished(Mutex<Sender<Session>>);

impl SessionConsumer for Finished {
    fn on_session_finished(&self, session: &Session) {
        if let Ok(tx) = self.0.lock() {
            let _ = tx.send(session.clone());
        }
    }
}

/// Everything one command invocation drives sessions through.
struct Runner {
    manager: SessionManager,
    analytics: Arc<Analytics>,
    notifier: Arc<SessionNotifier>,
    finished: Receiver<Session>,
    show_ticks: bool,
}

impl Runner {
    fn new(
        config: &Config,
        prefs: &dyn PreferenceStore,
        tick_ms: Option<u64>,
        format: OutputFormat,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let durations = TimerDurations::resolve(config, prefs);
        let tick = tick_ms.map_or_else(|| config.tick_interval(), Duration::from_millis);
        debug!(?durations, ?tick, "runner configured");

        let manager = SessionManager::with_tick_interval(Arc::clone(&clock), durations, tick);
        let analytics = Arc::new(Analytics::new(clock));
        let delivery: Arc<dyn Notifier> = match format {
            OutputFormat::Pretty => Arc::new(TerminalNotifier),
            OutputFormat::Json => Arc::new(LogNotifier),
        };
        let notifier = Arc::new(SessionNotifier::new(delivery, config.notifications.clone()));
        let (tx, finished) = mpsc::channel();

        manager.add_consumer(analytics.clone());
        manager.add_consumer(notifier.clone());
        manager.add_consumer(Arc::new(Finished(Mutex::new(tx))));

        Self {
            manager,
            analytics,
            notifier,
            finished,
            show_ticks: format == OutputFormat::Pretty,
        }
    }

    /// Run one session to completion in the foreground.
    fn run_session(
        &self,
        kind: TimerKind,
        duration: Option<u64>,
        task: Option<TaskRef>,
    ) -> Result<Session, TrackerError> {
        let (tx, events) = mpsc::channel();
        let id = self.manager.start_session(kind, duration, task)?;
        let timer = self.manager.timer();
        if let Some(timer) = &timer {
            timer.add_listener(Arc::new(ChannelListener::new(tx)));
        }
        info!(session = %id, %kind, "running session");

        let total = timer.as_ref().map_or(0, Timer::total);
        let label = kind.display_name();
        if self.show_ticks && total > 0 {
            print_tick(label, total, total);
        }

        loop {
            match events.recv_timeout(POLL) {
                Ok(TimerEvent::Tick(remaining)) if self.show_ticks => {
                    print_tick(label, remaining, total);
                }
                Ok(_) | Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {}
            }
            match self.finished.try_recv() {
                Ok(session) if session.id == id => {
                    if self.show_ticks {
                        eprintln!();
                    }
                    return Ok(session);
                }
                Ok(_) | Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => {
                    return Err(TrackerError::InvalidInput(
                        "session ended without being finalized".to_string(),
                    ));
                }
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn print_tick(label: &str, remaining: u64, total: u64) {
    let progress = if total == 0 {
        1.0
    } else {
        (total - remaining.min(total)) as f64 / total as f64
    };
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\r{}", format_tick_line(label, remaining, progress));
    let _ = stderr.flush();
}

fn parse_kind(kind: &str) -> Result<TimerKind, TrackerError> {
    TimerKind::parse(kind).ok_or_else(|| {
        TrackerError::InvalidInput(format!(
            "Unknown timer kind '{kind}'. Use work, short, long, break or custom."
        ))
    })
}

fn parse_length(duration: Option<&str>) -> Result<Option<u64>, TrackerError> {
    duration
        .map(|d| {
            parse_duration(d).ok_or_else(|| {
                TrackerError::InvalidInput(format!(
                    "Invalid duration '{d}'. Use e.g. 25, 25m, 1h30m or 90s."
                ))
            })
        })
        .transpose()
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the kind or duration cannot be parsed, the timer
/// cannot start, or output formatting fails.
pub fn run(
    args: RunArgs,
    config: &Config,
    prefs: &dyn PreferenceStore,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    let kind = parse_kind(&args.kind)?;
    let duration = parse_length(args.duration.as_deref())?;
    let runner = Runner::new(config, prefs, args.tick_ms, format);

    let mut task = args.task.map(Task::new);
    if let Some(task) = task.as_mut() {
        task.start();
    }

    let session = runner.run_session(kind, duration, task.as_ref().map(Task::to_ref))?;

    if let Some(task) = task.as_mut() {
        if args.complete_task && session.completed {
            task.complete();
            runner.analytics.ingest_task_completion(task);
            runner.notifier.notify_task(task);
        }
    }

    format_report(&[session], &runner.analytics.summary(), format)
}

/// Execute the cycle command.
///
/// # Errors
///
/// Returns an error if the rounds count is zero, a timer cannot start, or
/// output formatting fails.
pub fn cycle(
    args: CycleArgs,
    config: &Config,
    prefs: &dyn PreferenceStore,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    if args.rounds == 0 {
        return Err(TrackerError::InvalidInput(
            "A cycle needs at least one round".to_string(),
        ));
    }

    let runner = Runner::new(config, prefs, args.tick_ms, format);
    let mut sessions = Vec::new();

    for round in 1..=args.rounds {
        debug!(round, rounds = args.rounds, "cycle round");
        sessions.push(runner.run_session(TimerKind::Work, None, None)?);
        if round < args.rounds {
            let kind = runner.manager.suggested_next_kind();
            sessions.push(runner.run_session(kind, None, None)?);
        }
    }

    format_report(&sessions, &runner.analytics.summary(), format)
}
