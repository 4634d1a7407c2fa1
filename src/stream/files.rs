//! Locating and ordering frame images.

use super::StreamError;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An image file together with the frame index encoded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    /// Frame index taken from the file name's numeric part.
    pub frame_index: u64,
    /// Full path to the image.
    pub path: PathBuf,
}

/// Returns true for `.jpg`, `.jpeg` and `.png` files, ignoring case.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Extracts the first run of ASCII digits from a file name.
///
/// `frame_12.jpg` yields 12. Names without digits, or with a run too long
/// for a `u64`, yield `None`.
pub fn frame_index_from_name(name: &str) -> Option<u64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits = &name[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Lists the frame images of a directory ordered by frame index.
///
/// Ordering is numeric, so `frame_2` precedes `frame_10`.
pub fn list_frame_images(dir: &Path) -> Result<Vec<FrameImage>, StreamError> {
    if !dir.is_dir() {
        return Err(StreamError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|source| StreamError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StreamError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || !is_image_file(&path) {
            continue;
        }

        let name = entry.file_name();
        match frame_index_from_name(&name.to_string_lossy()) {
            Some(frame_index) => images.push(FrameImage { frame_index, path }),
            None => tracing::debug!(path = %path.display(), "Skipping image without frame number"),
        }
    }

    if images.is_empty() {
        return Err(StreamError::NoImagesFound(dir.to_path_buf()));
    }

    images.sort_by(|a, b| a.frame_index.cmp(&b.frame_index).then_with(|| a.path.cmp(&b.path)));
    Ok(images)
}
