//! Dashcam Telemetry Library
//!
//! Converts OCR readings of a dashcam's on-screen overlay (GPS position,
//! speed, date/time) into a clean, evenly indexed time series of vehicle
//! position and speed.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! frame images → ocr → parsing → stream → dataset → analysis
//!  (per video,                   (per kind) (joined)  (reindex + filter)
//!   per kind)
//! ```
//!
//! # Design Principles
//!
//! - **Noise is expected**: unparsable text resolves to a default value
//!   and is rejected statistically later, never aborting the run
//! - **Structure errors are fatal**: missing directories or images stop
//!   the run with the offending path
//! - **Ordered passes**: each filter pass sees only the survivors of the
//!   previous one and recomputes its statistics
//!
//! # Example
//!
//! ```no_run
//! use dashcam_telemetry::{
//!     analysis::{clean, FilterThresholds},
//!     dataset::{write_indexed, Assembler},
//!     ocr::TesseractEngine,
//!     stream::StreamBuilder,
//! };
//! use std::path::Path;
//!
//! let engine = TesseractEngine::default();
//! let assembler = Assembler::new(StreamBuilder::new(&engine));
//!
//! let assembly = assembler.assemble_all(Path::new("frames")).unwrap();
//! let outcome = clean(assembly.records, &FilterThresholds::default());
//!
//! write_indexed("output/filtered_dashcam.csv", outcome.records()).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod metrics;
pub mod ocr;
pub mod parsing;
pub mod stream;

// Re-export commonly used types at crate root
pub use analysis::{clean, CleanOutcome, FilterThresholds, OutlierFilter, TripSummary};
pub use config::FileConfig;
pub use dataset::{Assembler, IndexedRecord, Record};
pub use ocr::{MockOcr, OcrEngine, TesseractEngine};
pub use parsing::{Coordinates, Speed};
pub use stream::{AttributeKind, AttributeStream, StreamBuilder};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
