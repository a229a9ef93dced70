//! Tasks tracked alongside focus sessions.

mod task;

pub use task::{Priority, Task, TaskRef, TaskStatus};
