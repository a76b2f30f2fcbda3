//! Display formatting for attempt durations and dates.

use chrono::NaiveDateTime;

use crate::model::ATTEMPT_DATE_FORMAT;

/// Date format used in exports and charts.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// Format seconds as `MM:SS`, or `HH:MM:SS` from one hour up.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Format a signed elapsed time, treating negative values as zero.
pub fn format_elapsed(seconds: i64) -> String {
    format_duration(seconds.max(0) as u64)
}

/// Re-render an attempt date (`2024-05-01 14:30`) in 12-hour form
/// (`2024-05-01 02:30 PM`). Anything that doesn't parse is returned as-is.
pub fn format_date_ampm(date: &str) -> String {
    match NaiveDateTime::parse_from_str(date, ATTEMPT_DATE_FORMAT) {
        Ok(dt) => dt.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(e) => {
            tracing::debug!("keeping unparsed date '{date}': {e}");
            date.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_minutes_and_seconds() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(61), "01:01");
        assert_eq!(format_duration(599), "09:59");
        assert_eq!(format_duration(3599), "59:59");
    }

    #[test]
    fn duration_with_hours() {
        assert_eq!(format_duration(3600), "01:00:00");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(100 * 3600), "100:00:00");
    }

    #[test]
    fn elapsed_clamps_negative() {
        assert_eq!(format_elapsed(-5), "00:00");
        assert_eq!(format_elapsed(75), "01:15");
    }

    #[test]
    fn date_to_ampm() {
        assert_eq!(format_date_ampm("2024-05-01 14:30"), "2024-05-01 02:30 PM");
        assert_eq!(format_date_ampm("2024-05-01 00:05"), "2024-05-01 12:05 AM");
        assert_eq!(format_date_ampm("2024-05-01 12:00"), "2024-05-01 12:00 PM");
    }

    #[test]
    fn unparsable_date_falls_back() {
        assert_eq!(format_date_ampm("yesterday"), "yesterday");
        // Already converted dates pass through unchanged
        assert_eq!(
            format_date_ampm("2024-05-01 02:30 PM"),
            "2024-05-01 02:30 PM"
        );
    }
}
