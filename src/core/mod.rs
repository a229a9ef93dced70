//! Core abstractions for pomotrack.
//!
//! Shared by the timer, session and analytics features: the wall-clock
//! source and the helper that keeps a misbehaving callback from taking its
//! caller down with it.

mod clock;
mod isolate;

pub use clock::{local_date, Clock, ManualClock, SystemClock};
pub use isolate::call_isolated;
