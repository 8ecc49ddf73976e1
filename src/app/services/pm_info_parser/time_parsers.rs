//! Time-of-day extraction for PM:INFO lines
//!
//! Device logs carry one of several stamp styles in the line prefix. The
//! first recognized style wins; when none is present a deterministic time is
//! synthesized from the line number. Synthesized times order records but are
//! not wall-clock values.

use tracing::warn;

use super::patterns::{CLOCK_TIME, DATE_TIME, UPTIME_SECONDS};

/// Where an extracted time came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Literal `HH:MM:SS`
    Clock,
    /// `I>` seconds since boot
    Uptime,
    /// `MM/DD HH:MM:SS` stamp
    DateStamp,
    /// Derived from the line number
    LineNumber,
}

impl TimeSource {
    /// Whether the time was synthesized rather than read from the line
    pub fn is_synthetic(self) -> bool {
        self == TimeSource::LineNumber
    }
}

/// Extract a `HH:MM:SS` time from a line, falling back to the line number
pub fn extract_time(line: &str, line_number: usize) -> (String, TimeSource) {
    if let Some(caps) = CLOCK_TIME.captures(line) {
        return (caps[1].to_string(), TimeSource::Clock);
    }

    if let Some(caps) = UPTIME_SECONDS.captures(line) {
        match caps[1].parse::<f64>() {
            Ok(seconds) if seconds.is_finite() => {
                return (format_seconds(seconds), TimeSource::Uptime);
            }
            _ => warn!(
                "Line {}: unusable uptime stamp '{}', trying other formats",
                line_number, &caps[1]
            ),
        }
    }

    if let Some(caps) = DATE_TIME.captures(line) {
        return (caps[1].to_string(), TimeSource::DateStamp);
    }

    (fallback_time(line_number), TimeSource::LineNumber)
}

/// Format a seconds count as `HH:MM:SS`, truncating fractions
///
/// Hours are not wrapped, so uptimes past 99 hours widen the hour field.
pub fn format_seconds(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Synthesize a time from a 1-based line number, wrapping at 24 hours
pub fn fallback_time(line_number: usize) -> String {
    let seconds = line_number % 60;
    let minutes = (line_number / 60) % 60;
    let hours = (line_number / 3600) % 24;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_time_wins() {
        let (time, source) = extract_time("I>5.303 12:34:56 PM:INFO 1 2 3 4", 7);
        assert_eq!(time, "12:34:56");
        assert_eq!(source, TimeSource::Clock);
    }

    #[test]
    fn test_uptime_seconds() {
        let (time, source) = extract_time("I>5.303 PM:INFO 1 2 3 4", 7);
        assert_eq!(time, "00:00:05");
        assert_eq!(source, TimeSource::Uptime);

        let (time, _) = extract_time("[I>3725.9] PM:INFO 1 2 3 4", 7);
        assert_eq!(time, "01:02:05");
    }

    #[test]
    fn test_uptime_requires_fraction() {
        let (time, source) = extract_time("I>36 PM:INFO 1 2 3 4", 61);
        assert_eq!(source, TimeSource::LineNumber);
        assert_eq!(time, "00:01:01");
    }

    #[test]
    fn test_date_stamp_time_portion() {
        let (time, _) = extract_time("10/12 18:06:15 PM:INFO 1 2 3 4", 1);
        assert_eq!(time, "18:06:15");
    }

    #[test]
    fn test_fallback_time_from_line_number() {
        assert_eq!(fallback_time(0), "00:00:00");
        assert_eq!(fallback_time(1), "00:00:01");
        assert_eq!(fallback_time(59), "00:00:59");
        assert_eq!(fallback_time(61), "00:01:01");
        assert_eq!(fallback_time(3661), "01:01:01");
        assert_eq!(fallback_time(86_400 + 5), "00:00:05");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "00:00:00");
        assert_eq!(format_seconds(59.999), "00:00:59");
        assert_eq!(format_seconds(3600.0), "01:00:00");
        assert_eq!(format_seconds(360_000.5), "100:00:00");
    }

    #[test]
    fn test_synthetic_flag() {
        assert!(TimeSource::LineNumber.is_synthetic());
        assert!(!TimeSource::Clock.is_synthetic());
    }
}
