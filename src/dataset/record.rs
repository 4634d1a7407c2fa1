//! Row types of the assembled and cleaned tables.

use crate::parsing::{Coordinates, Speed};
use serde::{Deserialize, Serialize};

/// One assembled sample: the three readings of a single video frame.
///
/// Field order matches the `dashcam.csv` column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Frame index from the image file names (per video).
    pub frame_index: u64,
    /// `DD-MM-YYYY HH:MM:SS`, or raw OCR text if it did not parse.
    pub timestamp: String,
    /// Decimal degrees, south negative; 0 when the GPS text did not parse.
    pub latitude: f64,
    /// Decimal degrees, west negative.
    pub longitude: f64,
    /// Speed reading; 0 when the speed text did not parse.
    pub speed: u32,
    /// Unit token read next to the speed, e.g. `MPH`.
    pub speed_units: String,
}

impl Record {
    /// Combines the readings of one frame.
    pub fn new(frame_index: u64, timestamp: impl Into<String>, position: Coordinates, speed: &Speed) -> Self {
        Self {
            frame_index,
            timestamp: timestamp.into(),
            latitude: position.latitude,
            longitude: position.longitude,
            speed: speed.value,
            speed_units: speed.units.clone(),
        }
    }

    /// Replaces the frame index with a uniform sample index.
    pub fn into_indexed(self, new_index: u64) -> IndexedRecord {
        IndexedRecord {
            new_index,
            timestamp: self.timestamp,
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            speed_units: self.speed_units,
        }
    }
}

/// A sample after reindexing; rows of `filtered_dashcam.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedRecord {
    /// Uniform index: multiples of the modal frame interval.
    pub new_index: u64,
    /// Timestamp carried over from the assembled row.
    pub timestamp: String,
    /// Decimal degrees, south negative; 0 when the GPS text did not parse.
    pub latitude: f64,
    /// Decimal degrees, west negative.
    pub longitude: f64,
    /// Speed reading; 0 when the speed text did not parse.
    pub speed: u32,
    /// Unit token read next to the speed, e.g. `MPH`.
    pub speed_units: String,
}

impl IndexedRecord {
    /// Position of the sample.
    pub fn position(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
