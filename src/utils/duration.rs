//! Duration helpers for the timer: input clamping and display formatting

/// Clamp a numeric input into `[min, max]`, rounding to the nearest integer.
/// A non-numeric value (NaN) clamps to the minimum.
pub fn clamp_number(value: f64, min: u64, max: u64) -> u64 {
    if value.is_nan() {
        return min;
    }
    let rounded = value.round();
    if rounded <= min as f64 {
        min
    } else if rounded >= max as f64 {
        max
    } else {
        rounded as u64
    }
}

/// Format a second count as zero-padded `MM:SS`. Negative input reads as zero.
pub fn format_elapsed(total_seconds: i64) -> String {
    let safe_seconds = total_seconds.max(0);
    format!("{:02}:{:02}", safe_seconds / 60, safe_seconds % 60)
}
