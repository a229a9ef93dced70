//! Session notifications.
//!
//! The tracker only decides that a notification occurs and what it says.
//! How it is shown belongs to the [`Notifier`] implementation.

mod notifier;

pub use notifier::{
    LogNotifier, Notification, NotificationKind, Notifier, SessionNotifier, TerminalNotifier,
};
