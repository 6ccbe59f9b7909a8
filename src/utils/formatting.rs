//! Formatting utilities used for CLI outputs.

use chrono::Duration;

fn unit(n: i64, singular: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}s", n, singular)
    }
}

/// Human wording used in listings: "8 hours 30 minutes", "1 hour",
/// "12 minutes", falling back to seconds for very short spans.
pub fn readable_duration(d: Duration) -> String {
    let total = d.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;

    if hours != 0 {
        if minutes != 0 {
            return format!("{} {}", unit(hours, "hour"), unit(minutes, "minute"));
        }
        return unit(hours, "hour");
    }
    if minutes != 0 {
        return unit(minutes, "minute");
    }
    unit(seconds, "second")
}

/// True when a total is worth showing: at least one whole minute.
pub fn should_display(d: Duration) -> bool {
    d.num_minutes() != 0
}
