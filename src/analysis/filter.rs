//! Multi-pass outlier rejection.
//!
//! Rows damaged by OCR misreads are removed by three passes run in a
//! fixed order. Each pass computes its statistics over the rows that
//! survived the previous pass, then drops rows; surviving rows are never
//! modified and keep their relative order.
//!
//! 1. **Zero/domain**: latitude exactly 0 (the parser's fallback value) or
//!    coordinates outside ±90/±180.
//! 2. **Magnitude**: latitude, longitude and speed magnitudes outside
//!    `|mean| ± k·std`.
//! 3. **Delta**: frame-to-frame latitude/longitude steps outside
//!    `|mean| ± k'·std`, with `k' = k·(1 + c/n)`.

use super::statistics::ColumnStats;
use super::threshold::FilterThresholds;
use crate::dataset::IndexedRecord;
use std::fmt;

/// The filter passes, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterPass {
    /// Fallback latitude or out-of-range coordinates.
    ZeroDomain,
    /// Atypical position or speed magnitude.
    Magnitude,
    /// Atypical step from the previous row.
    Delta,
}

impl FilterPass {
    /// All passes in the order they run.
    pub const ORDER: [FilterPass; 3] = [FilterPass::ZeroDomain, FilterPass::Magnitude, FilterPass::Delta];

    /// Stable name used in logs and metric labels.
    pub fn name(self) -> &'static str {
        match self {
            FilterPass::ZeroDomain => "zero_domain",
            FilterPass::Magnitude => "magnitude",
            FilterPass::Delta => "delta",
        }
    }

    /// Runs this pass over `rows`.
    pub fn run(self, rows: Vec<IndexedRecord>, thresholds: &FilterThresholds) -> Vec<IndexedRecord> {
        match self {
            FilterPass::ZeroDomain => zero_domain_pass(rows),
            FilterPass::Magnitude => match MagnitudeStats::compute(&rows) {
                Some(stats) => magnitude_pass(rows, &stats, thresholds),
                None => rows,
            },
            FilterPass::Delta => delta_pass(rows, thresholds),
        }
    }
}

impl fmt::Display for FilterPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row counts around one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// The pass these counts belong to.
    pub pass: FilterPass,
    /// Rows entering the pass.
    pub rows_before: usize,
    /// Rows the pass kept.
    pub rows_after: usize,
}

impl PassReport {
    /// Rows removed by the pass.
    pub fn removed(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Surviving rows and per-pass counts.
#[derive(Debug, Clone)]
pub struct FilterReport {
    /// Rows that survived every pass, in input order.
    pub records: Vec<IndexedRecord>,
    /// One report per pass, in [`FilterPass::ORDER`].
    pub passes: Vec<PassReport>,
}

impl FilterReport {
    /// Total rows removed across all passes.
    pub fn removed(&self) -> usize {
        self.passes.iter().map(PassReport::removed).sum()
    }
}

/// Column statistics for the magnitude pass.
#[derive(Debug, Clone, Copy)]
pub struct MagnitudeStats {
    /// Latitude column.
    pub latitude: ColumnStats,
    /// Longitude column.
    pub longitude: ColumnStats,
    /// Speed column.
    pub speed: ColumnStats,
}

impl MagnitudeStats {
    /// Computes statistics over `rows`; `None` below two rows.
    pub fn compute(rows: &[IndexedRecord]) -> Option<Self> {
        let column = |f: fn(&IndexedRecord) -> f64| -> Vec<f64> { rows.iter().map(f).collect() };
        Some(Self {
            latitude: ColumnStats::from_values(&column(|r| r.latitude))?,
            longitude: ColumnStats::from_values(&column(|r| r.longitude))?,
            speed: ColumnStats::from_values(&column(|r| f64::from(r.speed)))?,
        })
    }

    fn admits(&self, row: &IndexedRecord, thresholds: &FilterThresholds) -> bool {
        self.latitude.admits(row.latitude, thresholds.position_k)
            && self.longitude.admits(row.longitude, thresholds.position_k)
            && self.speed.admits(f64::from(row.speed), thresholds.speed_k)
    }
}

/// Step statistics for the delta pass.
///
/// The first row has no predecessor, so its step is undefined: it does
/// not contribute to the statistics and the pass never drops it.
#[derive(Debug, Clone)]
pub struct DeltaStats {
    /// Latitude step into each row after the first.
    pub latitude_deltas: Vec<f64>,
    /// Longitude step into each row after the first.
    pub longitude_deltas: Vec<f64>,
    /// Statistics of the latitude steps.
    pub latitude: ColumnStats,
    /// Statistics of the longitude steps.
    pub longitude: ColumnStats,
}

impl DeltaStats {
    /// Computes steps and their statistics; `None` below three rows.
    pub fn compute(rows: &[IndexedRecord]) -> Option<Self> {
        let latitude_deltas: Vec<f64> = rows.windows(2).map(|w| w[1].latitude - w[0].latitude).collect();
        let longitude_deltas: Vec<f64> =
            rows.windows(2).map(|w| w[1].longitude - w[0].longitude).collect();

        Some(Self {
            latitude: ColumnStats::from_values(&latitude_deltas)?,
            longitude: ColumnStats::from_values(&longitude_deltas)?,
            latitude_deltas,
            longitude_deltas,
        })
    }
}

/// Drops fallback (latitude 0) and out-of-range coordinates.
pub fn zero_domain_pass(rows: Vec<IndexedRecord>) -> Vec<IndexedRecord> {
    rows.into_iter()
        .filter(|row| row.latitude != 0.0 && row.position().is_in_domain())
        .collect()
}

/// Drops rows whose position or speed magnitude is atypical.
pub fn magnitude_pass(
    rows: Vec<IndexedRecord>,
    stats: &MagnitudeStats,
    thresholds: &FilterThresholds,
) -> Vec<IndexedRecord> {
    tracing::debug!(
        lat_band = ?stats.latitude.magnitude_band(thresholds.position_k),
        lon_band = ?stats.longitude.magnitude_band(thresholds.position_k),
        speed_band = ?stats.speed.magnitude_band(thresholds.speed_k),
        "Magnitude bands"
    );
    rows.into_iter()
        .filter(|row| stats.admits(row, thresholds))
        .collect()
}

/// Drops rows whose step from the previous row is atypical.
///
/// Step statistics are computed from `rows` themselves; below three rows
/// they are undefined and every row is kept.
pub fn delta_pass(rows: Vec<IndexedRecord>, thresholds: &FilterThresholds) -> Vec<IndexedRecord> {
    let Some(stats) = DeltaStats::compute(&rows) else {
        return rows;
    };
    let k = thresholds.delta_k(rows.len());
    tracing::debug!(
        k,
        lat_band = ?stats.latitude.magnitude_band(k),
        lon_band = ?stats.longitude.magnitude_band(k),
        "Delta bands"
    );

    let steps_admitted = stats
        .latitude_deltas
        .iter()
        .zip(&stats.longitude_deltas)
        .map(|(&lat, &lon)| stats.latitude.admits(lat, k) && stats.longitude.admits(lon, k));

    std::iter::once(true)
        .chain(steps_admitted)
        .zip(rows)
        .filter_map(|(admitted, row)| admitted.then_some(row))
        .collect()
}

/// Runs every pass in order with configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct OutlierFilter {
    thresholds: FilterThresholds,
}

impl OutlierFilter {
    pub fn new(thresholds: FilterThresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the configured thresholds.
    pub fn thresholds(&self) -> &FilterThresholds {
        &self.thresholds
    }

    /// Filters `rows`, logging the row count before and after each pass.
    pub fn apply(&self, rows: Vec<IndexedRecord>) -> FilterReport {
        let mut rows = rows;
        let mut passes = Vec::with_capacity(FilterPass::ORDER.len());

        for pass in FilterPass::ORDER {
            let rows_before = rows.len();
            rows = pass.run(rows, &self.thresholds);
            let report = PassReport {
                pass,
                rows_before,
                rows_after: rows.len(),
            };
            tracing::info!(
                pass = %pass,
                before = report.rows_before,
                after = report.rows_after,
                removed = report.removed(),
                "Filter pass complete"
            );
            passes.push(report);
        }

        FilterReport {
            records: rows,
            passes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(i: u64, latitude: f64, longitude: f64, speed: u32) -> IndexedRecord {
        IndexedRecord {
            new_index: i * 3,
            timestamp: format!("08-04-2024 11:{:02}:{:02}", i / 60, i % 60),
            latitude,
            longitude,
            speed,
            speed_units: "MPH".to_string(),
        }
    }

    /// A straight drive with speed oscillating between 30 and 60.
    fn drive(n: u64) -> Vec<IndexedRecord> {
        (0..n)
            .map(|i| {
                let speed = 45 + (i % 7) as u32 * 5 - 15;
                let step = i as f64 * 0.0004 + (i % 5) as f64 * 0.00007;
                row(i, 30.4 + step, -97.66 - step * 0.8, speed)
            })
            .collect()
    }

    #[test]
    fn test_zero_domain_pass() {
        let rows = vec![
            row(0, 30.4, -97.6, 50),
            row(1, 0.0, -97.6, 50),
            row(2, 90.5, -97.6, 50),
            row(3, 30.4, 181.0, 50),
            row(4, -30.4, 97.6, 50),
            row(5, f64::NAN, -97.6, 50),
        ];
        let kept: Vec<u64> = zero_domain_pass(rows).iter().map(|r| r.new_index).collect();
        assert_eq!(kept, vec![0, 12]);
    }

    #[test]
    fn test_magnitude_pass_drops_distant_position_and_speed() {
        let mut rows = drive(60);
        rows[20].latitude = 40.459477;
        rows[40].speed = 1000;

        let stats = MagnitudeStats::compute(&rows).unwrap();
        let kept = magnitude_pass(rows, &stats, &FilterThresholds::default());

        assert_eq!(kept.len(), 58);
        assert!(kept.iter().all(|r| r.latitude < 40.0 && r.speed < 200));
    }

    #[test]
    fn test_delta_pass_drops_jump() {
        let mut rows = drive(400);
        // A jump out and back produces two extreme steps.
        rows[250].latitude += 0.05;

        let kept = delta_pass(rows, &FilterThresholds::default());

        assert_eq!(kept.len(), 398);
        assert_eq!(kept[0].new_index, 0);
        assert!(kept.iter().all(|r| r.new_index != 750 && r.new_index != 753));
    }

    #[test]
    fn test_delta_pass_uses_steps_of_its_own_rows() {
        let mut rows = drive(400);
        rows[250].latitude += 0.05;
        let short_stats = DeltaStats::compute(&rows[..4]).unwrap();
        assert_eq!(short_stats.latitude_deltas.len(), 3);

        let kept = delta_pass(rows, &FilterThresholds::default());
        assert_eq!(kept.len(), 398);
    }

    #[test]
    fn test_passes_skip_tiny_tables() {
        let thresholds = FilterThresholds::default();
        let rows = vec![row(0, 30.4, -97.6, 50), row(1, 31.9, -99.0, 80)];

        assert_eq!(FilterPass::Delta.run(rows.clone(), &thresholds).len(), 2);
        assert_eq!(FilterPass::Magnitude.run(rows[..1].to_vec(), &thresholds).len(), 1);
        assert!(OutlierFilter::default().apply(Vec::new()).records.is_empty());
    }

    #[test]
    fn test_apply_reports_each_pass() {
        let mut rows = drive(50);
        rows[10].latitude = 0.0;
        rows[10].longitude = 0.0;

        let report = OutlierFilter::default().apply(rows);

        assert_eq!(report.passes.len(), 3);
        assert_eq!(report.passes[0].pass, FilterPass::ZeroDomain);
        assert_eq!(report.passes[0].removed(), 1);
        assert_eq!(report.passes[2].rows_after, report.records.len());
        assert_eq!(report.removed(), 50 - report.records.len());
    }

    #[test]
    fn test_surviving_rows_unchanged_and_ordered() {
        let rows = drive(30);
        let report = OutlierFilter::default().apply(rows.clone());

        for kept in &report.records {
            assert!(rows.contains(kept));
        }
        assert!(report.records.windows(2).all(|w| w[0].new_index < w[1].new_index));
    }
}
