use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{AnalyzerError, Result};

/// Handles parsing the date and time columns of extracted events
pub struct TimestampParser;

impl TimestampParser {
    /// Parse an event's date ("MM/DD/YYYY", the year stamped on during
    /// extraction) and time ("HH:MM", occasionally "HH:MM:SS") into a
    /// naive timestamp. Report logs carry no timezone.
    pub fn parse(date: &str, time: &str) -> Result<NaiveDateTime> {
        let invalid = || AnalyzerError::InvalidTimestamp {
            value: format!("{} {}", date, time),
        };

        let date_part = NaiveDate::parse_from_str(date, "%m/%d/%Y").map_err(|_| invalid())?;
        let time_part = NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|_| invalid())?;

        Ok(NaiveDateTime::new(date_part, time_part))
    }
}

/// Render an elapsed duration as `HH:MM:SS`. Hours are not wrapped at 24,
/// so a week-long checkout renders as e.g. `168:00:00`. Negative spans keep
/// a leading sign.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds();
    let sign = if total_seconds < 0 { "-" } else { "" };
    let total_seconds = total_seconds.abs();
    format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stamped_date() {
        let result = TimestampParser::parse("04/11/2024", "10:21");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_with_seconds() {
        let result = TimestampParser::parse("04/11/2024", "10:21:30");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_unstamped_date_fails() {
        // An event before any year marker gets a bare "MM/DD/" date.
        let result = TimestampParser::parse("12/31/", "23:59");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_invalid() {
        let err = TimestampParser::parse("garbage", "10:21").unwrap_err();
        assert_eq!(err.to_string(), "Invalid timestamp 'garbage 10:21'");
    }

    #[test]
    fn test_format_duration_basic() {
        assert_eq!(format_duration(Duration::seconds(3661)), "01:01:01");
    }

    #[test]
    fn test_format_duration_beyond_a_day() {
        assert_eq!(format_duration(Duration::hours(168)), "168:00:00");
    }

    #[test]
    fn test_format_duration_negative() {
        assert_eq!(format_duration(Duration::seconds(-90)), "-00:01:30");
    }

    #[test]
    fn test_format_duration_zero() {
        assert_eq!(format_duration(Duration::zero()), "00:00:00");
    }
}
