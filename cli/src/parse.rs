//! Argument parsing helpers for REPL commands

use chrono::{DateTime, NaiveDateTime, Weekday};
use tocsin_core::Timestamp;

/// Parse `HH:MM` or `HH:MM:SS` into hours, minutes, seconds.
///
/// Components are not range checked here; the alarm table rejects times
/// past 24:00:00.
pub fn time_of_day(text: &str) -> Result<(i32, i32, i32), String> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(format!("expected HH:MM[:SS], got '{text}'"));
    }

    let mut fields = [0i32; 3];
    for (field, part) in fields.iter_mut().zip(&parts) {
        *field = part
            .parse()
            .map_err(|_| format!("invalid number '{part}' in '{text}'"))?;
    }
    Ok((fields[0], fields[1], fields[2]))
}

/// Parse a weekday name such as `mon` or `Friday`
pub fn weekday(text: &str) -> Result<Weekday, String> {
    text.trim()
        .parse::<Weekday>()
        .map_err(|_| format!("unknown weekday '{text}'"))
}

/// Parse an absolute time: epoch seconds or `YYYY-MM-DD HH:MM:SS` (UTC)
pub fn epoch(text: &str) -> Result<Timestamp, String> {
    let text = text.trim();
    if let Ok(secs) = text.parse::<Timestamp>() {
        return Ok(secs);
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|_| format!("expected epoch seconds or 'YYYY-MM-DD HH:MM:SS', got '{text}'"))
}

/// Render an epoch time for display
pub fn format_epoch(t: Timestamp) -> String {
    DateTime::from_timestamp(t, 0)
        .map(|dt| dt.format("%a %Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day() {
        assert_eq!(time_of_day("08:30"), Ok((8, 30, 0)));
        assert_eq!(time_of_day("23:59:59"), Ok((23, 59, 59)));
        assert_eq!(time_of_day("25:00"), Ok((25, 0, 0)));
        assert!(time_of_day("8").is_err());
        assert!(time_of_day("8:xx").is_err());
        assert!(time_of_day("1:2:3:4").is_err());
    }

    #[test]
    fn test_weekday() {
        assert_eq!(weekday("mon"), Ok(Weekday::Mon));
        assert_eq!(weekday("Friday"), Ok(Weekday::Fri));
        assert!(weekday("someday").is_err());
    }

    #[test]
    fn test_epoch() {
        assert_eq!(epoch("1735689600"), Ok(1_735_689_600));
        assert_eq!(epoch("2025-01-01 00:00:00"), Ok(1_735_689_600));
        assert!(epoch("tomorrow").is_err());
    }

    #[test]
    fn test_format_epoch() {
        assert_eq!(format_epoch(1_735_689_600), "Wed 2025-01-01 00:00:00");
    }
}
