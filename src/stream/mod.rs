//! Per-attribute frame streams.
//!
//! A stream is built from one `<video>/<kind>/` directory of cropped
//! overlay images: each image is recognized, parsed with the parser for
//! the directory's kind, and stored under the frame index encoded in its
//! file name. OCR dominates the cost, so images are recognized in
//! parallel on the current rayon pool.

mod files;
mod kind;

pub use files::{frame_index_from_name, is_image_file, list_frame_images, FrameImage};
pub use kind::{AttributeKind, AttributeValue};

use crate::ocr::OcrEngine;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort building a stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("directory contains no .jpg, .jpeg or .png images: {0}")]
    NoImagesFound(PathBuf),
    #[error("failed to read directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("interrupted")]
    Interrupted,
}

/// Frame index → parsed value for one attribute kind of one video.
#[derive(Debug, Clone, Default)]
pub struct AttributeStream {
    /// Kind derived from the directory name, if recognized.
    pub kind: Option<AttributeKind>,
    /// Parsed values keyed by frame index. Keys need not be contiguous.
    pub entries: BTreeMap<u64, AttributeValue>,
    /// Images whose text did not parse and received a fallback value.
    pub parse_failures: usize,
    /// Images the OCR engine failed on (treated as empty text).
    pub ocr_failures: usize,
}

impl AttributeStream {
    /// Creates an empty stream of the given kind.
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Inserts a value, replacing any previous value for the frame.
    pub fn insert(&mut self, frame_index: u64, value: AttributeValue) {
        self.entries.insert(frame_index, value);
    }

    /// Returns the value recorded for a frame.
    pub fn get(&self, frame_index: u64) -> Option<&AttributeValue> {
        self.entries.get(&frame_index)
    }

    /// Number of frames in the stream.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the stream holds no frames.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frame indices in ascending order.
    pub fn frame_indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }
}

/// Outcome of recognizing and parsing one image.
struct Reading {
    frame_index: u64,
    value: AttributeValue,
    ocr_failed: bool,
    parse_failed: bool,
}

/// Builds attribute streams from frame image directories.
pub struct StreamBuilder<'e> {
    engine: &'e dyn OcrEngine,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'e> StreamBuilder<'e> {
    /// Creates a builder recognizing images with `engine`.
    pub fn new(engine: &'e dyn OcrEngine) -> Self {
        Self {
            engine,
            cancel: None,
        }
    }

    /// Stops work with [`StreamError::Interrupted`] once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Builds the stream for one `<video>/<kind>/` directory.
    ///
    /// The kind comes from the directory's final path segment. An unknown
    /// kind does not abort: every frame is recorded as
    /// [`AttributeValue::Unrecognized`].
    pub fn build(&self, dir: &Path) -> Result<AttributeStream, StreamError> {
        let images = list_frame_images(dir)?;
        let kind = dir
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(AttributeKind::from_dir_name);

        if kind.is_none() {
            tracing::warn!(
                dir = %dir.display(),
                "Directory is not recognized as gps, speed or time"
            );
        }

        tracing::info!(
            dir = %dir.display(),
            images = images.len(),
            engine = self.engine.name(),
            "Building attribute stream"
        );

        let readings: Vec<Reading> = images
            .par_iter()
            .map(|image| self.read(kind, image))
            .collect::<Result<_, _>>()?;

        let mut stream = AttributeStream {
            kind,
            ..Default::default()
        };
        for reading in readings {
            stream.ocr_failures += usize::from(reading.ocr_failed);
            stream.parse_failures += usize::from(reading.parse_failed);
            stream.insert(reading.frame_index, reading.value);
        }

        if stream.parse_failures > 0 {
            tracing::warn!(
                dir = %dir.display(),
                failures = stream.parse_failures,
                total = stream.len(),
                "Some readings fell back to default values"
            );
        }

        Ok(stream)
    }

    fn read(&self, kind: Option<AttributeKind>, image: &FrameImage) -> Result<Reading, StreamError> {
        if self.is_cancelled() {
            return Err(StreamError::Interrupted);
        }

        let Some(kind) = kind else {
            return Ok(Reading {
                frame_index: image.frame_index,
                value: AttributeValue::Unrecognized,
                ocr_failed: false,
                parse_failed: false,
            });
        };

        let (text, ocr_failed) = match self.engine.recognize(&image.path) {
            Ok(text) => (text, false),
            Err(e) => {
                tracing::warn!(image = %image.path.display(), error = %e, "OCR failed");
                (String::new(), true)
            }
        };

        let outcome = kind.parse(&text);
        let parse_failed = outcome.is_fallback();
        if parse_failed {
            tracing::debug!(
                image = %image.path.display(),
                text = %text.trim(),
                %kind,
                "Unparsable OCR text"
            );
        }

        Ok(Reading {
            frame_index: image.frame_index,
            value: outcome.into_value(),
            ocr_failed,
            parse_failed,
        })
    }
}
