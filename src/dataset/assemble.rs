//! Joining attribute streams into records.
//!
//! A record exists only for frames present in all three streams. Frames
//! missing from any stream are dropped; the loss is counted and logged
//! rather than treated as an error.

use super::record::Record;
use crate::stream::{AttributeKind, AttributeStream, StreamBuilder, StreamError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort assembly.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("frames directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("frames directory contains no video subdirectories: {0}")]
    NoVideosFound(PathBuf),
    #[error("video directory {video} has no `{missing}` subdirectory")]
    IncompleteVideoDirectory {
        video: PathBuf,
        missing: AttributeKind,
    },
    #[error("failed to read directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Result of joining the three streams of one video.
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    /// Joined rows in ascending frame order.
    pub records: Vec<Record>,
    /// Frames present in at least one stream but not in all three.
    pub dropped_frames: Vec<u64>,
}

/// Inner-joins time, GPS and speed streams on frame index.
///
/// A frame whose entry in any stream holds a value of the wrong kind is
/// treated as missing from that stream.
pub fn join_streams(time: &AttributeStream, gps: &AttributeStream, speed: &AttributeStream) -> JoinOutcome {
    let mut outcome = JoinOutcome::default();

    let mut all_frames: Vec<u64> = time
        .frame_indices()
        .chain(gps.frame_indices())
        .chain(speed.frame_indices())
        .collect();
    all_frames.sort_unstable();
    all_frames.dedup();

    for frame in all_frames {
        let timestamp = time.get(frame).and_then(|v| v.as_timestamp());
        let position = gps.get(frame).and_then(|v| v.as_coordinates());
        let reading = speed.get(frame).and_then(|v| v.as_speed());

        match (timestamp, position, reading) {
            (Some(timestamp), Some(position), Some(reading)) => {
                outcome
                    .records
                    .push(Record::new(frame, timestamp, position, reading));
            }
            _ => outcome.dropped_frames.push(frame),
        }
    }

    outcome
}

/// Per-stream counts for one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    /// Attribute kind of the stream.
    pub kind: AttributeKind,
    /// Frame images recognized.
    pub images: usize,
    /// Readings that fell back to a default value.
    pub parse_failures: usize,
    /// Images the OCR engine failed on.
    pub ocr_failures: usize,
}

impl StreamSummary {
    fn of(kind: AttributeKind, stream: &AttributeStream) -> Self {
        Self {
            kind,
            images: stream.len(),
            parse_failures: stream.parse_failures,
            ocr_failures: stream.ocr_failures,
        }
    }
}

/// Assembly counts for one video.
#[derive(Debug, Clone)]
pub struct VideoReport {
    /// Video directory name.
    pub video: String,
    /// Rows produced by the join.
    pub rows: usize,
    /// Frames lost in the join.
    pub dropped_frames: usize,
    /// Per-kind stream counts, in [`AttributeKind::ALL`] order.
    pub streams: Vec<StreamSummary>,
}

/// Records of one or more videos plus per-video counts.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Rows of every video, concatenated in video order.
    pub records: Vec<Record>,
    /// One report per video, in processing order.
    pub videos: Vec<VideoReport>,
}

/// Builds the record table of a frames directory.
pub struct Assembler<'e> {
    builder: StreamBuilder<'e>,
}

impl<'e> Assembler<'e> {
    pub fn new(builder: StreamBuilder<'e>) -> Self {
        Self { builder }
    }

    /// Assembles one `<video>/` directory with `gps`, `speed` and `time` subdirectories.
    ///
    /// The three streams are built concurrently; the join waits for all of them.
    pub fn assemble_video(&self, video_dir: &Path) -> Result<Assembly, AssembleError> {
        if !video_dir.is_dir() {
            return Err(AssembleError::DirectoryNotFound(video_dir.to_path_buf()));
        }
        for kind in AttributeKind::ALL {
            if !video_dir.join(kind.dir_name()).is_dir() {
                return Err(AssembleError::IncompleteVideoDirectory {
                    video: video_dir.to_path_buf(),
                    missing: kind,
                });
            }
        }

        let stream_dir = |kind: AttributeKind| video_dir.join(kind.dir_name());
        let (time, (gps, speed)) = rayon::join(
            || self.builder.build(&stream_dir(AttributeKind::Time)),
            || {
                rayon::join(
                    || self.builder.build(&stream_dir(AttributeKind::Gps)),
                    || self.builder.build(&stream_dir(AttributeKind::Speed)),
                )
            },
        );
        let (time, gps, speed) = (time?, gps?, speed?);

        let joined = join_streams(&time, &gps, &speed);
        let video = video_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !joined.dropped_frames.is_empty() {
            tracing::warn!(
                video = %video,
                dropped = joined.dropped_frames.len(),
                frames = ?joined.dropped_frames,
                "Frames missing from at least one stream were dropped"
            );
        }
        tracing::info!(video = %video, rows = joined.records.len(), "Assembled video");

        let report = VideoReport {
            video,
            rows: joined.records.len(),
            dropped_frames: joined.dropped_frames.len(),
            streams: vec![
                StreamSummary::of(AttributeKind::Time, &time),
                StreamSummary::of(AttributeKind::Gps, &gps),
                StreamSummary::of(AttributeKind::Speed, &speed),
            ],
        };

        Ok(Assembly {
            records: joined.records,
            videos: vec![report],
        })
    }

    /// Assembles every video directory under `root` into one table.
    ///
    /// Videos are processed in file-name order and concatenated as-is, so
    /// frame indices restart with each video.
    pub fn assemble_all(&self, root: &Path) -> Result<Assembly, AssembleError> {
        let videos = video_dirs(root)?;
        tracing::info!(root = %root.display(), videos = videos.len(), "Assembling videos");

        let mut assembly = Assembly::default();
        for video_dir in videos {
            let video = self.assemble_video(&video_dir)?;
            assembly.records.extend(video.records);
            assembly.videos.extend(video.videos);
        }

        tracing::info!(rows = assembly.records.len(), "Assembled dataset");
        Ok(assembly)
    }
}

fn video_dirs(root: &Path) -> Result<Vec<PathBuf>, AssembleError> {
    if !root.is_dir() {
        return Err(AssembleError::DirectoryNotFound(root.to_path_buf()));
    }
    let io_error = |source| AssembleError::Io {
        path: root.to_path_buf(),
        source,
    };

    let mut videos = Vec::new();
    for entry in std::fs::read_dir(root).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            videos.push(path);
        }
    }

    if videos.is_empty() {
        return Err(AssembleError::NoVideosFound(root.to_path_buf()));
    }
    videos.sort();
    Ok(videos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{Coordinates, Speed};
    use crate::stream::AttributeValue;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn streams(time: &[u64], gps: &[u64], speed: &[u64]) -> (AttributeStream, AttributeStream, AttributeStream) {
        let mut t = AttributeStream::new(AttributeKind::Time);
        for &f in time {
            t.insert(f, AttributeValue::Time(format!("08-04-2024 11:28:{f:02}")));
        }
        let mut g = AttributeStream::new(AttributeKind::Gps);
        for &f in gps {
            g.insert(f, AttributeValue::Gps(Coordinates::new(30.7 + f as f64 * 1e-4, -97.7)));
        }
        let mut s = AttributeStream::new(AttributeKind::Speed);
        for &f in speed {
            s.insert(f, AttributeValue::Speed(Speed::new(60 + f as u32, "MPH")));
        }
        (t, g, s)
    }

    #[test]
    fn test_join_keeps_common_frames() {
        let (t, g, s) = streams(&[0, 3, 6, 9], &[0, 3, 9], &[0, 3, 6, 9, 12]);

        let outcome = join_streams(&t, &g, &s);

        let frames: Vec<u64> = outcome.records.iter().map(|r| r.frame_index).collect();
        assert_eq!(frames, vec![0, 3, 9]);
        assert_eq!(outcome.dropped_frames, vec![6, 12]);

        let row = &outcome.records[1];
        assert_eq!(row.timestamp, "08-04-2024 11:28:03");
        assert_eq!(row.speed, 63);
        assert_eq!(row.speed_units, "MPH");
    }

    #[test]
    fn test_join_drops_frame_missing_only_from_speed() {
        let (t, g, s) = streams(&[0, 3, 6], &[0, 3, 6], &[0, 6]);

        let outcome = join_streams(&t, &g, &s);

        let frames: Vec<u64> = outcome.records.iter().map(|r| r.frame_index).collect();
        assert_eq!(frames, vec![0, 6]);
        assert_eq!(outcome.dropped_frames, vec![3]);
    }

    #[test]
    fn test_join_drops_frame_missing_only_from_time() {
        let (t, g, s) = streams(&[3, 6], &[0, 3, 6], &[0, 3, 6]);

        let outcome = join_streams(&t, &g, &s);

        let frames: Vec<u64> = outcome.records.iter().map(|r| r.frame_index).collect();
        assert_eq!(frames, vec![3, 6]);
        assert_eq!(outcome.dropped_frames, vec![0]);
    }

    #[test]
    fn test_join_rejects_mismatched_kind() {
        let (t, mut g, s) = streams(&[0, 1], &[0, 1], &[0, 1]);
        g.insert(1, AttributeValue::Unrecognized);

        let outcome = join_streams(&t, &g, &s);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.dropped_frames, vec![1]);
    }

    #[test]
    fn test_join_empty_streams() {
        let (t, g, s) = streams(&[], &[], &[]);
        let outcome = join_streams(&t, &g, &s);
        assert!(outcome.records.is_empty());
        assert!(outcome.dropped_frames.is_empty());
    }

    proptest! {
        #[test]
        fn prop_join_is_key_intersection(
            time in prop::collection::btree_set(0u64..40, 0..30),
            gps in prop::collection::btree_set(0u64..40, 0..30),
            speed in prop::collection::btree_set(0u64..40, 0..30),
        ) {
            let as_vec = |set: &BTreeSet<u64>| set.iter().copied().collect::<Vec<_>>();
            let (t, g, s) = streams(&as_vec(&time), &as_vec(&gps), &as_vec(&speed));

            let outcome = join_streams(&t, &g, &s);

            let expected: Vec<u64> = time
                .iter()
                .filter(|&&f| gps.contains(&f) && speed.contains(&f))
                .copied()
                .collect();
            let frames: Vec<u64> = outcome.records.iter().map(|r| r.frame_index).collect();
            prop_assert_eq!(frames, expected);

            let union: BTreeSet<u64> = time.iter().chain(&gps).chain(&speed).copied().collect();
            let dropped: Vec<u64> = union
                .iter()
                .filter(|&&f| !(time.contains(&f) && gps.contains(&f) && speed.contains(&f)))
                .copied()
                .collect();
            prop_assert_eq!(&outcome.dropped_frames, &dropped);
        }
    }
}
