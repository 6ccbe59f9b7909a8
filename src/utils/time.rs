//! Time utilities: parsing "8h" / "7h30m" style durations.

use crate::errors::{AppError, AppResult};
use chrono::Duration;

/// Parse a duration written as hours and/or minutes: "8h", "45m", "7h30m",
/// "7h 30m". A bare number is read as hours.
pub fn parse_duration(s: &str) -> AppResult<Duration> {
    let input: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if input.is_empty() {
        return Err(AppError::InvalidDuration(s.to_string()));
    }

    if let Ok(hours) = input.parse::<i64>() {
        return Ok(Duration::hours(hours));
    }

    let mut minutes = 0i64;
    let mut number = String::new();
    let mut seen_unit = false;

    for c in input.to_lowercase().chars() {
        match c {
            '0'..='9' => number.push(c),
            'h' | 'm' => {
                let n: i64 = number
                    .parse()
                    .map_err(|_| AppError::InvalidDuration(s.to_string()))?;
                minutes += if c == 'h' { n * 60 } else { n };
                number.clear();
                seen_unit = true;
            }
            _ => return Err(AppError::InvalidDuration(s.to_string())),
        }
    }

    if !number.is_empty() || !seen_unit {
        return Err(AppError::InvalidDuration(s.to_string()));
    }

    Ok(Duration::minutes(minutes))
}
