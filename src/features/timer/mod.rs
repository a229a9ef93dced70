//! Countdown timer state machine.
//!
//! Provides the ticking [`Timer`], its listener interface and the
//! [`TimerKind`] catalog:
//! - start/pause/resume/reset/stop transitions
//! - one tick notification per elapsed second while running
//! - duration parsing and formatting helpers

mod engine;
pub mod format;
mod kind;
mod listener;

pub use engine::{Timer, TimerState};
pub use format::{format_duration, format_mmss, parse_duration, render_progress_bar};
pub use kind::{next_kind, TimerKind};
pub use listener::{ChannelListener, ListenerId, TimerEvent, TimerListener};
