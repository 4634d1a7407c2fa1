//! Uniform sample index reconstruction.
//!
//! Frames are sampled at a fixed period, but OCR-dropped frames leave
//! gaps and each video restarts its numbering. The modal step between
//! consecutive frame indices recovers the sampling period, and rows are
//! renumbered `0, p, 2p, ...` in table order.

use super::statistics::modal_interval;
use crate::dataset::{IndexedRecord, Record};

/// Step used when the table has no positive index step.
pub const DEFAULT_INTERVAL: u64 = 1;

/// Reindexed table and the interval it was built with.
#[derive(Debug, Clone)]
pub struct Reindexed {
    /// Rows in input order with their new index.
    pub records: Vec<IndexedRecord>,
    /// Step between consecutive new indices.
    pub interval: u64,
}

/// Replaces frame indices with a strictly increasing constant-step index.
///
/// If the modal interval times the row count would not fit in a `u64`,
/// [`DEFAULT_INTERVAL`] is used instead.
pub fn reindex(records: Vec<Record>) -> Reindexed {
    let indices: Vec<u64> = records.iter().map(|r| r.frame_index).collect();
    let mut interval = modal_interval(&indices).unwrap_or(DEFAULT_INTERVAL);

    let last_position = records.len().saturating_sub(1) as u64;
    if interval.checked_mul(last_position).is_none() {
        tracing::warn!(
            interval,
            rows = records.len(),
            "Modal interval overflows the index range, falling back to {}",
            DEFAULT_INTERVAL
        );
        interval = DEFAULT_INTERVAL;
    }

    tracing::info!(rows = records.len(), interval, "Reindexing");

    let records = records
        .into_iter()
        .zip((0u64..).map(|i| i * interval))
        .map(|(record, new_index)| record.into_indexed(new_index))
        .collect();

    Reindexed { records, interval }
}
