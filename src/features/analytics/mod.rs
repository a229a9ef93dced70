//! Productivity analytics.
//!
//! Aggregates finalized sessions and completed tasks into:
//! - per-session and per-task snapshots
//! - per-day buckets with accumulated focus time
//! - a running focus total and a derived productivity score

mod engine;
mod score;
mod stats;

pub use engine::{Analytics, AnalyticsSummary};
pub use score::productivity_score;
pub use stats::{DailyStats, SessionStats, TaskStats};
