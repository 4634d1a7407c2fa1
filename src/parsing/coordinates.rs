//! GPS coordinate parsing.
//!
//! The overlay prints a hemisphere letter followed by decimal degrees,
//! e.g. `N30.426786 W97.665820`. OCR frequently inserts spaces or stray
//! punctuation around the decimal point and between the letter and the
//! digits, so the pattern only anchors on the letters and digit runs.

use super::ParseOutcome;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A latitude/longitude pair in signed decimal degrees (N/E positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Value substituted when no coordinates can be read.
    ///
    /// Indistinguishable from a real reading at (0, 0); rows carrying it
    /// are dropped by the zero/domain filter pass.
    pub const SENTINEL: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    /// Creates a new coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if both components lie inside the valid degree ranges.
    pub fn is_in_domain(&self) -> bool {
        self.latitude.abs() <= 90.0 && self.longitude.abs() <= 180.0
    }
}

fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"([NS])[^0-9]*([0-9]+)\s*\.\s*([0-9]+)\s*([EW])[^0-9]*([0-9]+)\s*\.\s*([0-9]+)",
        )
        .expect("coordinate pattern is valid")
    })
}

/// Parses a hemisphere-tagged coordinate pair out of OCR text.
///
/// Returns `None` if the text holds no recognizable pair.
pub fn parse_coordinates(text: &str) -> Option<Coordinates> {
    let caps = coordinate_pattern().captures(text)?;

    let latitude = degrees(&caps[2], &caps[3])?;
    let longitude = degrees(&caps[5], &caps[6])?;

    let latitude = if &caps[1] == "S" { -latitude } else { latitude };
    let longitude = if &caps[4] == "W" { -longitude } else { longitude };

    Some(Coordinates::new(latitude, longitude))
}

/// Parses coordinates, substituting [`Coordinates::SENTINEL`] on failure.
pub fn coordinates_or_fallback(text: &str) -> ParseOutcome<Coordinates> {
    ParseOutcome::resolve(parse_coordinates(text), || Coordinates::SENTINEL)
}

fn degrees(whole: &str, fraction: &str) -> Option<f64> {
    format!("{whole}.{fraction}").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_space_before_decimal_point() {
        let coords = parse_coordinates("N40.426786 W97 .665820").unwrap();
        assert_eq!(coords.latitude, 40.426786);
        assert_eq!(coords.longitude, -97.665820);
    }

    #[test]
    fn test_southern_eastern_hemispheres() {
        let coords = parse_coordinates("S33.868820 E151.209290").unwrap();
        assert_eq!(coords.latitude, -33.868820);
        assert_eq!(coords.longitude, 151.209290);
    }

    #[test]
    fn test_noise_between_letter_and_digits() {
        let coords = parse_coordinates("  N: 30. 759489  W:97.730664\n").unwrap();
        assert_eq!(coords.latitude, 30.759489);
        assert_eq!(coords.longitude, -97.730664);
    }

    #[test]
    fn test_missing_hemisphere_letters() {
        assert!(parse_coordinates("40.426786 97.665820").is_none());

        let outcome = coordinates_or_fallback("40.426786 97.665820");
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_value(), Coordinates::SENTINEL);
    }

    #[test]
    fn test_domain_check() {
        assert!(Coordinates::new(30.5, -97.7).is_in_domain());
        assert!(!Coordinates::new(91.0, 0.0).is_in_domain());
        assert!(!Coordinates::new(0.0, -180.5).is_in_domain());
    }

    proptest! {
        #[test]
        fn prop_never_panics(text in "\\PC*") {
            let _ = coordinates_or_fallback(&text);
        }

        #[test]
        fn prop_reads_formatted_pair(lat in 0.0f64..90.0, lon in 0.0f64..180.0, south: bool, west: bool) {
            let text = format!(
                "{}{:.6} {}{:.6}",
                if south { 'S' } else { 'N' },
                lat,
                if west { 'W' } else { 'E' },
                lon
            );
            let coords = parse_coordinates(&text).unwrap();
            prop_assert!((coords.latitude.abs() - lat).abs() < 1e-6);
            prop_assert!((coords.longitude.abs() - lon).abs() < 1e-6);
            prop_assert_eq!(coords.latitude < 0.0, south && coords.latitude != 0.0);
            prop_assert_eq!(coords.longitude < 0.0, west && coords.longitude != 0.0);
        }
    }
}
