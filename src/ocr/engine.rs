//! OCR engine abstraction.
//!
//! A trait-based seam over text recognition, allowing the real
//! Tesseract binary to be swapped for a mock in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while recognizing one image.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to launch OCR engine {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        source: std::io::Error,
    },
    #[error("OCR engine failed on {path} (exit code {code:?}): {stderr}")]
    Failed {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },
    #[error("OCR of {path} did not finish within {timeout:?}")]
    Timeout { path: PathBuf, timeout: Duration },
    #[error("I/O error while running OCR on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no text registered for {0}")]
    Unavailable(PathBuf),
}

/// Trait for text recognition engines.
///
/// Implementations must be shareable across worker threads: images are
/// recognized in parallel, one call per image.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &str;

    /// Recognizes the text in a single image file.
    fn recognize(&self, image: &Path) -> Result<String, OcrError>;
}

/// Mock engine returning preset text per image path.
///
/// Paths without registered text fail with [`OcrError::Unavailable`],
/// which exercises the same recovery path as a crashed engine.
#[derive(Debug, Default, Clone)]
pub struct MockOcr {
    texts: HashMap<PathBuf, String>,
}

impl MockOcr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the text returned for `image`.
    pub fn insert(&mut self, image: impl Into<PathBuf>, text: impl Into<String>) {
        self.texts.insert(image.into(), text.into());
    }

    /// Builder form of [`MockOcr::insert`].
    pub fn with_text(mut self, image: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(image, text);
        self
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns true if no text is registered.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl OcrEngine for MockOcr {
    fn name(&self) -> &str {
        "mock"
    }

    fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        self.texts
            .get(image)
            .cloned()
            .ok_or_else(|| OcrError::Unavailable(image.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_registered_text() {
        let ocr = MockOcr::new().with_text("frames/a/gps/frame_0.jpg", "N30.1 W97.2");

        assert_eq!(ocr.len(), 1);
        assert_eq!(
            ocr.recognize(Path::new("frames/a/gps/frame_0.jpg")).unwrap(),
            "N30.1 W97.2"
        );
    }

    #[test]
    fn test_mock_unknown_image() {
        let ocr = MockOcr::new();
        assert!(ocr.is_empty());
        assert!(matches!(
            ocr.recognize(Path::new("missing.png")),
            Err(OcrError::Unavailable(_))
        ));
    }
}
