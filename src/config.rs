//! Pipeline configuration.
//!
//! Loaded from an optional TOML file; every section and field falls back
//! to its default, so an empty file is a valid configuration.

use crate::analysis::{FilterThresholds, ThresholdError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest per-image OCR deadline accepted, in seconds.
const MAX_TIMEOUT_SECS: u64 = 3600;

/// Highest page segmentation mode accepted by Tesseract.
const MAX_PAGE_SEGMENTATION_MODE: u8 = 13;

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path or name of the `tesseract` executable.
    pub tesseract_binary: PathBuf,
    /// Per-image deadline in seconds.
    pub timeout_secs: u64,
    /// Tesseract `--psm` mode; overlays are single text lines (7).
    pub page_segmentation_mode: Option<u8>,
    /// Worker threads for OCR (0 = one per core).
    pub workers: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_binary: PathBuf::from("tesseract"),
            timeout_secs: 10,
            page_segmentation_mode: Some(7),
            workers: 0,
        }
    }
}

impl OcrConfig {
    /// Validates the OCR settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout);
        }
        if let Some(mode) = self.page_segmentation_mode {
            if mode > MAX_PAGE_SEGMENTATION_MODE {
                return Err(ConfigError::InvalidPageSegmentationMode(mode));
            }
        }
        Ok(())
    }
}

/// Output table locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving both tables.
    pub output_dir: PathBuf,
    /// File name of the assembled, unfiltered table.
    pub raw_file: String,
    /// File name of the reindexed, filtered table.
    pub cleaned_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            raw_file: "dashcam.csv".to_string(),
            cleaned_file: "filtered_dashcam.csv".to_string(),
        }
    }
}

impl OutputConfig {
    /// Path of the assembled table.
    pub fn raw_path(&self) -> PathBuf {
        self.output_dir.join(&self.raw_file)
    }

    /// Path of the cleaned table.
    pub fn cleaned_path(&self) -> PathBuf {
        self.output_dir.join(&self.cleaned_file)
    }

    /// Validates the output settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.raw_file.trim().is_empty() {
            return Err(ConfigError::EmptyFileName("raw_file"));
        }
        if self.cleaned_file.trim().is_empty() {
            return Err(ConfigError::EmptyFileName("cleaned_file"));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("OCR timeout must be between 1 and 3600 seconds")]
    InvalidTimeout,
    #[error("invalid page segmentation mode {0} (must be 0-13)")]
    InvalidPageSegmentationMode(u8),
    #[error("output file name `{0}` must not be empty")]
    EmptyFileName(&'static str),
    #[error("invalid filter threshold: {0}")]
    Threshold(#[from] ThresholdError),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[ocr]` section.
    #[serde(default)]
    pub ocr: OcrConfig,
    /// `[filter]` section.
    #[serde(default)]
    pub filter: FilterThresholds,
    /// `[output]` section.
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ocr.validate()?;
        self.filter.validate()?;
        self.output.validate()?;
        Ok(())
    }
}
