//! Duration parsing and formatting for countdowns.

/// Format a number of seconds as MM:SS.
#[must_use]
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a number of seconds as a human-readable string.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let plural = |n: u64| if n == 1 { "" } else { "s" };

    if seconds < 60 {
        return format!("{seconds} second{}", plural(seconds));
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    match (hours, minutes) {
        (0, m) => format!("{m} minute{}", plural(m)),
        (h, 0) => format!("{h} hour{}", plural(h)),
        (h, m) => format!("{h} hour{}, {m} minute{}", plural(h), plural(m)),
    }
}

/// Parse a duration like `25`, `25m`, `1h30m` or `90s` into seconds.
///
/// A bare number, or a trailing number without a unit, counts as minutes.
/// Zero is accepted in any spelling. Returns `None` for malformed input and
/// for lengths that do not fit in a `u64` of seconds.
#[must_use]
pub fn parse_duration(s: &str) -> Option<u64> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    let mut total: u64 = 0;
    let mut digits = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return None;
        }
        let scale = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        let n: u64 = digits.parse().ok()?;
        digits.clear();
        total = total.checked_add(n.checked_mul(scale)?)?;
    }

    if !digits.is_empty() {
        let minutes: u64 = digits.parse().ok()?;
        total = total.checked_add(minutes.checked_mul(60)?)?;
    }

    Some(total)
}

/// Render a progress bar for `progress` in `0.0..=1.0`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0)) * width as f64) as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
