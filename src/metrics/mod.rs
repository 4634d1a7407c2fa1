//! Prometheus metrics for pipeline runs.
//!
//! The pipeline is a batch job, so metrics are rendered once at the end
//! of a run in the Prometheus text format (for a node-exporter textfile
//! collector or archival next to the output tables).
//!
//! # Metrics Exposed
//!
//! ## Stream Metrics (label `kind` = gps/speed/time)
//! - `dashcam_images_processed_total` - Frame images recognized
//! - `dashcam_ocr_failures_total` - Images the OCR engine failed on
//! - `dashcam_parse_failures_total` - Readings that fell back to a default value
//!
//! ## Assembly Metrics
//! - `dashcam_videos_assembled_total` - Videos assembled
//! - `dashcam_join_dropped_frames_total` - Frames missing from at least one stream
//! - `dashcam_rows_assembled` - Rows in the assembled table
//!
//! ## Filter Metrics (label `pass` = zero_domain/magnitude/delta)
//! - `dashcam_filter_rows_before` - Rows entering each pass
//! - `dashcam_filter_rows_after` - Rows surviving each pass
//! - `dashcam_rows_cleaned` - Rows in the cleaned table
//! - `dashcam_reindex_interval` - Modal frame interval
//!
//! # Example
//!
//! ```no_run
//! use dashcam_telemetry::metrics::PipelineMetrics;
//!
//! let metrics = PipelineMetrics::new().expect("Failed to create registry");
//! std::fs::write("output/metrics.prom", metrics.encode().unwrap()).unwrap();
//! ```

mod collector;

pub use collector::{MetricsError, PipelineMetrics};
