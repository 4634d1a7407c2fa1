//! Speed readout parsing.

use super::ParseOutcome;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Units assumed when the readout cannot be parsed.
pub const DEFAULT_SPEED_UNITS: &str = "MPH";

/// A speed reading with its unit token, e.g. `72 MPH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speed {
    /// Integer speed as printed by the overlay.
    pub value: u32,
    /// Unit token as recognized (not normalized).
    pub units: String,
}

impl Speed {
    /// Creates a speed reading.
    pub fn new(value: u32, units: impl Into<String>) -> Self {
        Self {
            value,
            units: units.into(),
        }
    }

    /// Value substituted when no speed can be read.
    pub fn fallback() -> Self {
        Self::new(0, DEFAULT_SPEED_UNITS)
    }
}

fn speed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([0-9]{1,3})\s*([A-Za-z]{3,}.*)").expect("speed pattern is valid")
    })
}

/// Parses up to three digits followed by a unit token of at least three letters.
pub fn parse_speed(text: &str) -> Option<Speed> {
    let caps = speed_pattern().captures(text)?;
    let value = caps[1].parse().ok()?;
    Some(Speed::new(value, caps[2].trim_end()))
}

/// Parses a speed, substituting [`Speed::fallback`] on failure.
pub fn speed_or_fallback(text: &str) -> ParseOutcome<Speed> {
    ParseOutcome::resolve(parse_speed(text), Speed::fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spaced_units() {
        assert_eq!(parse_speed("8   MPH"), Some(Speed::new(8, "MPH")));
    }

    #[test]
    fn test_trailing_noise_trimmed() {
        assert_eq!(parse_speed("72 MPH  \n"), Some(Speed::new(72, "MPH")));
        assert_eq!(parse_speed("105KPH"), Some(Speed::new(105, "KPH")));
    }

    #[test]
    fn test_short_unit_token_rejected() {
        assert!(parse_speed("55 MP").is_none());
    }

    #[test]
    fn test_no_digits_falls_back() {
        let outcome = speed_or_fallback("MPH");
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_value(), Speed::new(0, "MPH"));
    }

    proptest! {
        #[test]
        fn prop_never_panics(text in "\\PC*") {
            let _ = speed_or_fallback(&text);
        }

        #[test]
        fn prop_reads_printed_speed(value in 0u32..1000, gap in " {0,3}") {
            let text = format!("{value}{gap}MPH");
            prop_assert_eq!(parse_speed(&text), Some(Speed::new(value, "MPH")));
        }
    }
}
