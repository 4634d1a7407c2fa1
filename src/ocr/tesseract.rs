//! Tesseract command-line backend.
//!
//! Runs `tesseract <image> stdout` per image. The engine can hang on
//! corrupt input, so every call carries a deadline after which the child
//! process is killed and the image reported as failed.

use super::engine::{OcrEngine, OcrError};
use crate::config::OcrConfig;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// OCR engine backed by the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    page_segmentation_mode: Option<u8>,
    timeout: Duration,
}

impl TesseractEngine {
    /// Creates an engine using the given executable and a 10 s deadline.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            page_segmentation_mode: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Creates an engine from the `[ocr]` configuration section.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            binary: config.tesseract_binary.clone(),
            page_segmentation_mode: config.page_segmentation_mode,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Sets the `--psm` page segmentation mode (7 = single text line).
    pub fn with_page_segmentation_mode(mut self, mode: u8) -> Self {
        self.page_segmentation_mode = Some(mode);
        self
    }

    /// Sets the per-image deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, image: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(image).arg("stdout");
        if let Some(mode) = self.page_segmentation_mode {
            cmd.arg("--psm").arg(mode.to_string());
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn wait_with_deadline(&self, child: &mut Child, image: &Path) -> Result<Option<i32>, OcrError> {
        // A deadline past the end of the clock means no deadline.
        let deadline = Instant::now().checked_add(self.timeout);
        loop {
            let status = child.try_wait().map_err(|source| OcrError::Io {
                path: image.to_path_buf(),
                source,
            })?;

            match status {
                Some(status) if status.success() => return Ok(None),
                Some(status) => return Ok(Some(status.code().unwrap_or(-1))),
                None if deadline.is_some_and(|deadline| Instant::now() >= deadline) => {
                    // Best effort: the child may exit between the check and the kill.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(OcrError::Timeout {
                        path: image.to_path_buf(),
                        timeout: self.timeout,
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract").with_page_segmentation_mode(7)
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let mut child = self.command(image).spawn().map_err(|source| OcrError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        // Drain both pipes on their own threads so a chatty child cannot
        // block on a full pipe while we poll for exit.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let failure_code = self.wait_with_deadline(&mut child, image)?;
        let text = join_reader(stdout);
        let errors = join_reader(stderr);

        match failure_code {
            None => {
                tracing::trace!(image = %image.display(), text = %text.trim(), "OCR complete");
                Ok(text)
            }
            Some(code) => Err(OcrError::Failed {
                path: image.to_path_buf(),
                code: Some(code),
                stderr: errors.trim().to_string(),
            }),
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = source.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_reports_spawn_error() {
        let engine = TesseractEngine::new("/nonexistent/tesseract-binary");
        assert!(matches!(
            engine.recognize(Path::new("frame_0.jpg")),
            Err(OcrError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        // `echo` stands in for tesseract: it prints its arguments.
        let engine = TesseractEngine::new("echo").with_page_segmentation_mode(7);
        let text = engine.recognize(Path::new("frame_3.jpg")).unwrap();
        assert_eq!(text.trim(), "frame_3.jpg stdout --psm 7");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        let engine = TesseractEngine::new("false");
        assert!(matches!(
            engine.recognize(Path::new("frame_0.jpg")),
            Err(OcrError::Failed { code: Some(1), .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unbounded_timeout_still_recognizes() {
        let engine = TesseractEngine::new("echo").with_timeout(Duration::MAX);
        let text = engine.recognize(Path::new("frame_0.jpg")).unwrap();
        assert_eq!(text.trim(), "frame_0.jpg stdout");
    }

    #[test]
    fn test_from_config() {
        let config = OcrConfig {
            timeout_secs: 3,
            page_segmentation_mode: Some(6),
            ..Default::default()
        };
        let engine = TesseractEngine::from_config(&config);
        assert_eq!(engine.timeout, Duration::from_secs(3));
        assert_eq!(engine.page_segmentation_mode, Some(6));
    }
}
