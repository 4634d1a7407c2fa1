//! Date/time overlay parsing.
//!
//! The overlay prints `DD-MM-YYYY HH:MM:SS`; OCR tends to break the
//! separators apart (`11:  04 :13`), so any run of non-digits is accepted
//! between fields and the result is rebuilt in canonical form.

use super::ParseOutcome;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

/// `chrono` format string of canonical timestamps.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"([0-9]{2})[^0-9]*([0-9]{2})[^0-9]*([0-9]{4})\s*([0-9]{2})[^0-9]*([0-9]{2})\s*[^0-9]*([0-9]{2})",
        )
        .expect("timestamp pattern is valid")
    })
}

/// Extracts a timestamp and rewrites it as `DD-MM-YYYY HH:MM:SS`.
///
/// Field values are not range checked; `timestamp_to_datetime` does that.
pub fn parse_timestamp(text: &str) -> Option<String> {
    let caps = timestamp_pattern().captures(text)?;
    Some(format!(
        "{}-{}-{} {}:{}:{}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5], &caps[6]
    ))
}

/// Parses a timestamp, passing the input through unchanged on failure.
pub fn timestamp_or_fallback(text: &str) -> ParseOutcome<String> {
    ParseOutcome::resolve(parse_timestamp(text), || text.to_string())
}

/// Interprets a canonical timestamp as a calendar date and time.
pub fn timestamp_to_datetime(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()
}
