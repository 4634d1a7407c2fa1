//! Attribute kinds and their parsed values.

use crate::parsing::{
    coordinates_or_fallback, speed_or_fallback, timestamp_or_fallback, Coordinates, ParseOutcome,
    Speed,
};
use std::fmt;

/// One of the three independently sampled overlay signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKind {
    /// Latitude/longitude readout.
    Gps,
    /// Speed readout.
    Speed,
    /// Date/time readout.
    Time,
}

impl AttributeKind {
    /// All kinds, in the order their subdirectories are assembled.
    pub const ALL: [AttributeKind; 3] = [AttributeKind::Time, AttributeKind::Gps, AttributeKind::Speed];

    /// Maps a frame directory name (`gps`, `speed`, `time`) to its kind.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "gps" => Some(AttributeKind::Gps),
            "speed" => Some(AttributeKind::Speed),
            "time" => Some(AttributeKind::Time),
            _ => None,
        }
    }

    /// Name of the per-video subdirectory holding this kind's images.
    pub fn dir_name(self) -> &'static str {
        match self {
            AttributeKind::Gps => "gps",
            AttributeKind::Speed => "speed",
            AttributeKind::Time => "time",
        }
    }

    /// Parses OCR text with this kind's parser.
    pub fn parse(self, text: &str) -> ParseOutcome<AttributeValue> {
        match self {
            AttributeKind::Gps => coordinates_or_fallback(text).map(AttributeValue::Gps),
            AttributeKind::Speed => speed_or_fallback(text).map(AttributeValue::Speed),
            AttributeKind::Time => timestamp_or_fallback(text).map(AttributeValue::Time),
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A parsed value for one frame of one attribute stream.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Position read from a `gps` image.
    Gps(Coordinates),
    /// Speed read from a `speed` image.
    Speed(Speed),
    /// Canonical timestamp, or the raw text if it did not parse.
    Time(String),
    /// Recorded for every frame of a directory whose kind is unknown.
    Unrecognized,
}

impl AttributeValue {
    /// Kind of the value, `None` for [`AttributeValue::Unrecognized`].
    pub fn kind(&self) -> Option<AttributeKind> {
        match self {
            AttributeValue::Gps(_) => Some(AttributeKind::Gps),
            AttributeValue::Speed(_) => Some(AttributeKind::Speed),
            AttributeValue::Time(_) => Some(AttributeKind::Time),
            AttributeValue::Unrecognized => None,
        }
    }

    /// The position of a [`AttributeValue::Gps`] value.
    pub fn as_coordinates(&self) -> Option<Coordinates> {
        match self {
            AttributeValue::Gps(coords) => Some(*coords),
            _ => None,
        }
    }

    /// The reading of a [`AttributeValue::Speed`] value.
    pub fn as_speed(&self) -> Option<&Speed> {
        match self {
            AttributeValue::Speed(speed) => Some(speed),
            _ => None,
        }
    }

    /// The text of a [`AttributeValue::Time`] value.
    pub fn as_timestamp(&self) -> Option<&str> {
        match self {
            AttributeValue::Time(timestamp) => Some(timestamp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_name_round_trip() {
        for kind in AttributeKind::ALL {
            assert_eq!(AttributeKind::from_dir_name(kind.dir_name()), Some(kind));
        }
        assert_eq!(AttributeKind::from_dir_name("GPS"), None);
        assert_eq!(AttributeKind::from_dir_name("audio"), None);
    }

    #[test]
    fn test_parse_dispatch() {
        let gps = AttributeKind::Gps.parse("N30.759489 W97.730664");
        assert_eq!(
            gps.value().as_coordinates(),
            Some(Coordinates::new(30.759489, -97.730664))
        );

        let speed = AttributeKind::Speed.parse("72 MPH");
        assert_eq!(speed.value().as_speed(), Some(&Speed::new(72, "MPH")));

        let time = AttributeKind::Time.parse("08-04-2024 11:28:08");
        assert_eq!(time.value().as_timestamp(), Some("08-04-2024 11:28:08"));
    }

    #[test]
    fn test_fallback_values_keep_kind() {
        let outcome = AttributeKind::Gps.parse("");
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value().kind(), Some(AttributeKind::Gps));
        assert_eq!(outcome.value().as_coordinates(), Some(Coordinates::SENTINEL));
    }
}
