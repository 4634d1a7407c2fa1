//! Trip summary of a cleaned table.
//!
//! Gives the figures a map renderer needs up front: the centre point for
//! the initial view and the speed range for the colour scale.

use crate::dataset::IndexedRecord;
use crate::parsing::{timestamp_to_datetime, Coordinates};
use chrono::Duration;
use std::fmt;

/// Aggregate figures of a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    /// Rows summarized.
    pub rows: usize,
    /// Mean latitude/longitude.
    pub centroid: Coordinates,
    /// Lowest and highest speed, the colour scale range.
    pub min_speed: u32,
    pub max_speed: u32,
    pub mean_speed: f64,
    /// Timestamps of the first and last rows as stored.
    pub first_timestamp: String,
    pub last_timestamp: String,
    /// Elapsed time between first and last row, if both timestamps parse.
    pub duration: Option<Duration>,
}

impl TripSummary {
    /// Summarizes `records`; `None` for an empty table.
    pub fn from_records(records: &[IndexedRecord]) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;
        let n = records.len() as f64;

        let centroid = Coordinates::new(
            records.iter().map(|r| r.latitude).sum::<f64>() / n,
            records.iter().map(|r| r.longitude).sum::<f64>() / n,
        );
        let speeds = records.iter().map(|r| r.speed);
        let min_speed = speeds.clone().min()?;
        let max_speed = speeds.clone().max()?;
        let mean_speed = speeds.map(f64::from).sum::<f64>() / n;

        let duration = match (
            timestamp_to_datetime(&first.timestamp),
            timestamp_to_datetime(&last.timestamp),
        ) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        };

        Some(Self {
            rows: records.len(),
            centroid,
            min_speed,
            max_speed,
            mean_speed,
            first_timestamp: first.timestamp.clone(),
            last_timestamp: last.timestamp.clone(),
            duration,
        })
    }
}

impl fmt::Display for TripSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows from {} to {}",
            self.rows, self.first_timestamp, self.last_timestamp
        )?;
        if let Some(duration) = self.duration {
            let secs = duration.num_seconds();
            write!(f, " ({}h{:02}m{:02}s)", secs / 3600, (secs % 3600) / 60, secs % 60)?;
        }
        write!(
            f,
            ", centre ({:.6}, {:.6}), speed {}-{} (mean {:.1})",
            self.centroid.latitude,
            self.centroid.longitude,
            self.min_speed,
            self.max_speed,
            self.mean_speed
        )
    }
}
