/// Render a second count as `MM:SS`. Minutes are never wrapped or truncated.
pub fn format_minutes_seconds(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Fraction of `total` already elapsed when `remaining` is left, in [0, 1].
pub fn elapsed_fraction(total: u32, remaining: u32) -> f64 {
    match total {
        0 => 0.0,
        total => {
            let elapsed = total.saturating_sub(remaining) as f64;
            (elapsed / total as f64).clamp(0.0, 1.0)
        }
    }
}
