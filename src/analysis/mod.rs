//! Index reconstruction and statistical cleaning.
//!
//! Turns the assembled table into the cleaned series: frames are
//! renumbered on a uniform grid, then rows produced by OCR misreads are
//! rejected by the outlier filter. Statistics are heuristics tuned for
//! OCR noise, not a model of GPS error.

mod filter;
mod reindex;
mod statistics;
mod summary;
mod threshold;

pub use filter::{
    delta_pass, magnitude_pass, zero_domain_pass, DeltaStats, FilterPass, FilterReport,
    MagnitudeStats, OutlierFilter, PassReport,
};
pub use reindex::{reindex, Reindexed, DEFAULT_INTERVAL};
pub use statistics::{mean, modal_interval, sample_std, ColumnStats};
pub use summary::TripSummary;
pub use threshold::{FilterThresholds, ThresholdError};

use crate::dataset::{IndexedRecord, Record};

/// Result of cleaning an assembled table.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// Modal frame interval used for the new index.
    pub interval: u64,
    /// Rows before filtering.
    pub rows_in: usize,
    /// Surviving rows and per-pass counts.
    pub report: FilterReport,
}

impl CleanOutcome {
    /// The cleaned rows.
    pub fn records(&self) -> &[IndexedRecord] {
        &self.report.records
    }
}

/// Reindexes `records` and runs the outlier filter.
pub fn clean(records: Vec<Record>, thresholds: &FilterThresholds) -> CleanOutcome {
    let rows_in = records.len();
    let reindexed = reindex(records);
    let report = OutlierFilter::new(thresholds.clone()).apply(reindexed.records);

    tracing::info!(
        rows_in,
        rows_out = report.records.len(),
        interval = reindexed.interval,
        "Cleaned dataset"
    );

    CleanOutcome {
        interval: reindexed.interval,
        rows_in,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{Coordinates, Speed};

    #[test]
    fn test_clean_drops_fallback_rows() {
        let mut records: Vec<Record> = (0..20)
            .map(|i| {
                Record::new(
                    i * 3,
                    "08-04-2024 11:04:13",
                    Coordinates::new(30.4 + i as f64 * 0.001, -97.6 - i as f64 * 0.001),
                    &Speed::new(50 + (i % 4) as u32, "MPH"),
                )
            })
            .collect();
        records[7] = Record::new(21, "08-04-2024 11:04:34", Coordinates::SENTINEL, &Speed::new(52, "MPH"));

        let outcome = clean(records, &FilterThresholds::default());

        assert_eq!(outcome.interval, 3);
        assert_eq!(outcome.rows_in, 20);
        assert!(outcome.records().iter().all(|r| r.latitude != 0.0));
        assert!(outcome.records().iter().all(|r| r.new_index % 3 == 0));
        assert!(outcome.records().iter().all(|r| r.new_index != 21));
    }
}
