//! Focus session lifecycle.
//!
//! A session wraps exactly one run of a [`Timer`](crate::features::timer::Timer):
//! it is opened when the timer starts and finalized when the timer completes
//! or is stopped early. Finalized sessions are handed to every registered
//! [`SessionConsumer`].

mod manager;
mod record;

pub use manager::{SessionConsumer, SessionManager};
pub use record::Session;
