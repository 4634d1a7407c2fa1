#![allow(dead_code)]

use dashcam_telemetry::{Coordinates, Record, Speed};
use std::fs;
use std::path::Path;

/// A synthetic trip heading north-west with stop-and-go speed.
///
/// Position advances in proportion to speed, so steps vary realistically
/// and the cleaned table has no statistical outliers of its own.
pub fn synthetic_trip(rows: usize) -> Vec<Record> {
    let mut latitude = 30.40;
    let mut longitude = -97.66;

    (0..rows)
        .map(|i| {
            let t = i as f64;
            let speed = (45.0 + 25.0 * (t / 9.0).sin()).round() as u32;
            let step = f64::from(speed) * 0.000012;
            latitude += step * 0.8;
            longitude -= step * 0.6 + 0.00001 * (t / 5.0).sin();

            let seconds = 4 * 60 + i * 3;
            Record::new(
                i as u64 * 3,
                format!("08-04-2024 11:{:02}:{:02}", seconds / 60, seconds % 60),
                Coordinates::new(latitude, longitude),
                &Speed::new(speed, "MPH"),
            )
        })
        .collect()
}

/// Creates empty image files `frame_<n>.jpg` under `dir`.
pub fn touch_frames(dir: &Path, frames: &[u64]) {
    fs::create_dir_all(dir).unwrap();
    for frame in frames {
        fs::write(dir.join(format!("frame_{frame}.jpg")), b"").unwrap();
    }
}
