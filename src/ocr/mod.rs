//! Optical character recognition backends.
//!
//! The OCR engine is treated as an opaque function from an image file to
//! text. Frames are cropped and pre-processed upstream; this module only
//! turns the resulting image regions into strings.

mod engine;
mod tesseract;

pub use engine::{MockOcr, OcrEngine, OcrError};
pub use tesseract::TesseractEngine;
