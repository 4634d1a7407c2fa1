//! Tolerant parsers for OCR text.
//!
//! Each parser accepts the raw text recognized from one overlay region
//! and returns `None` when nothing usable is found. Recognition noise is
//! expected and frequent, so the `*_or_fallback` helpers resolve a failed
//! parse to a well-defined default instead of an error. The outcome still
//! records which path was taken so that a genuine zero reading can be told
//! apart from a failed one.

mod coordinates;
mod speed;
mod timestamp;

pub use coordinates::{coordinates_or_fallback, parse_coordinates, Coordinates};
pub use speed::{parse_speed, speed_or_fallback, Speed, DEFAULT_SPEED_UNITS};
pub use timestamp::{parse_timestamp, timestamp_or_fallback, timestamp_to_datetime, TIMESTAMP_FORMAT};

/// Result of resolving OCR text to a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<T> {
    /// The text matched the expected pattern.
    Parsed(T),
    /// The text did not match; the value is the parser's default.
    Fallback(T),
}

impl<T> ParseOutcome<T> {
    /// Returns the resolved value, discarding how it was obtained.
    pub fn into_value(self) -> T {
        match self {
            ParseOutcome::Parsed(value) | ParseOutcome::Fallback(value) => value,
        }
    }

    /// Returns a reference to the resolved value.
    pub fn value(&self) -> &T {
        match self {
            ParseOutcome::Parsed(value) | ParseOutcome::Fallback(value) => value,
        }
    }

    /// Returns true if the default value was substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ParseOutcome::Fallback(_))
    }

    /// Maps the resolved value while keeping the outcome kind.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        match self {
            ParseOutcome::Parsed(value) => ParseOutcome::Parsed(f(value)),
            ParseOutcome::Fallback(value) => ParseOutcome::Fallback(f(value)),
        }
    }

    pub(crate) fn resolve(parsed: Option<T>, fallback: impl FnOnce() -> T) -> Self {
        match parsed {
            Some(value) => ParseOutcome::Parsed(value),
            None => ParseOutcome::Fallback(fallback()),
        }
    }
}
