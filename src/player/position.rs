/// Render a position in seconds as `H:MM:SS`, or `MM:SS` under an hour.
///
/// Fractions are truncated, so the text only changes on whole seconds.
pub fn positional_time(seconds: f64) -> String {
    // Callers never pass negative or NaN values; clamp instead of wrapping.
    let total_seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Text for the remaining label: whole seconds left from `position` to `duration`.
pub fn remaining_time(duration: f64, position: f64) -> String {
    positional_time(duration - position.max(0.0).floor())
}
