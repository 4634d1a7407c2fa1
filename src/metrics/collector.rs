//! Metrics collection and registry.

use crate::analysis::FilterReport;
use crate::dataset::Assembly;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("metrics output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Prometheus registry for one pipeline run.
pub struct PipelineMetrics {
    registry: Registry,

    // Stream metrics
    images_processed: IntCounterVec,
    ocr_failures: IntCounterVec,
    parse_failures: IntCounterVec,

    // Assembly metrics
    videos_assembled: IntCounter,
    join_dropped_frames: IntCounter,
    rows_assembled: IntGauge,

    // Filter metrics
    filter_rows_before: IntGaugeVec,
    filter_rows_after: IntGaugeVec,
    rows_cleaned: IntGauge,
    reindex_interval: IntGauge,
}

impl PipelineMetrics {
    /// Creates a registry with all pipeline metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let images_processed = IntCounterVec::new(
            Opts::new("dashcam_images_processed_total", "Frame images recognized"),
            &["kind"],
        )?;
        let ocr_failures = IntCounterVec::new(
            Opts::new("dashcam_ocr_failures_total", "Images the OCR engine failed on"),
            &["kind"],
        )?;
        let parse_failures = IntCounterVec::new(
            Opts::new(
                "dashcam_parse_failures_total",
                "Readings that fell back to a default value",
            ),
            &["kind"],
        )?;

        let videos_assembled = IntCounter::new("dashcam_videos_assembled_total", "Videos assembled")?;
        let join_dropped_frames = IntCounter::new(
            "dashcam_join_dropped_frames_total",
            "Frames missing from at least one attribute stream",
        )?;
        let rows_assembled = IntGauge::new("dashcam_rows_assembled", "Rows in the assembled table")?;

        let filter_rows_before = IntGaugeVec::new(
            Opts::new("dashcam_filter_rows_before", "Rows entering each filter pass"),
            &["pass"],
        )?;
        let filter_rows_after = IntGaugeVec::new(
            Opts::new("dashcam_filter_rows_after", "Rows surviving each filter pass"),
            &["pass"],
        )?;
        let rows_cleaned = IntGauge::new("dashcam_rows_cleaned", "Rows in the cleaned table")?;
        let reindex_interval = IntGauge::new(
            "dashcam_reindex_interval",
            "Modal frame interval used for the uniform index",
        )?;

        registry.register(Box::new(images_processed.clone()))?;
        registry.register(Box::new(ocr_failures.clone()))?;
        registry.register(Box::new(parse_failures.clone()))?;
        registry.register(Box::new(videos_assembled.clone()))?;
        registry.register(Box::new(join_dropped_frames.clone()))?;
        registry.register(Box::new(rows_assembled.clone()))?;
        registry.register(Box::new(filter_rows_before.clone()))?;
        registry.register(Box::new(filter_rows_after.clone()))?;
        registry.register(Box::new(rows_cleaned.clone()))?;
        registry.register(Box::new(reindex_interval.clone()))?;

        Ok(Self {
            registry,
            images_processed,
            ocr_failures,
            parse_failures,
            videos_assembled,
            join_dropped_frames,
            rows_assembled,
            filter_rows_before,
            filter_rows_after,
            rows_cleaned,
            reindex_interval,
        })
    }

    /// Records the counts of an assembly run.
    pub fn record_assembly(&self, assembly: &Assembly) {
        for video in &assembly.videos {
            self.videos_assembled.inc();
            self.join_dropped_frames.inc_by(video.dropped_frames as u64);
            for stream in &video.streams {
                let kind = [stream.kind.dir_name()];
                self.images_processed
                    .with_label_values(&kind)
                    .inc_by(stream.images as u64);
                self.ocr_failures
                    .with_label_values(&kind)
                    .inc_by(stream.ocr_failures as u64);
                self.parse_failures
                    .with_label_values(&kind)
                    .inc_by(stream.parse_failures as u64);
            }
        }
        self.rows_assembled.set(assembly.records.len() as i64);
    }

    /// Records per-pass row counts and the reindex interval.
    pub fn record_filter(&self, interval: u64, report: &FilterReport) {
        self.reindex_interval.set(interval as i64);
        for pass in &report.passes {
            let label = [pass.pass.name()];
            self.filter_rows_before
                .with_label_values(&label)
                .set(pass.rows_before as i64);
            self.filter_rows_after
                .with_label_values(&label)
                .set(pass.rows_after as i64);
        }
        self.rows_cleaned.set(report.records.len() as i64);
    }

    /// Renders all metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
