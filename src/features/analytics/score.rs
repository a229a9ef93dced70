//! Productivity score heuristic.

/// Upper bound of the score.
pub const MAX_SCORE: f64 = 100.0;

/// Completed tasks per focused minute, as a percentage capped at 100.
///
/// A deliberately simple heuristic: it is cheap to recompute from running
/// totals and moves in the right direction, but mixes a count with a
/// duration and is not meant as a rigorous metric. Focus time counts in
/// whole minutes. Zero tasks or zero minutes score 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn productivity_score(completed_tasks: usize, focus_seconds: i64) -> f64 {
    let focus_minutes = focus_seconds / 60;
    if completed_tasks == 0 || focus_minutes <= 0 {
        return 0.0;
    }
    ((completed_tasks as f64 / focus_minutes as f64) * 100.0).min(MAX_SCORE)
}
