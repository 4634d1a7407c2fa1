//! CSV persistence of the assembled and cleaned tables.

use super::record::{IndexedRecord, Record};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing a table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Writes `dashcam.csv`-style rows, creating parent directories as needed.
pub fn write_records(path: impl AsRef<Path>, records: &[Record]) -> Result<(), TableError> {
    write_rows(path.as_ref(), records)
}

/// Reads `dashcam.csv`-style rows.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>, TableError> {
    read_rows(path.as_ref())
}

/// Writes `filtered_dashcam.csv`-style rows, creating parent directories as needed.
pub fn write_indexed(path: impl AsRef<Path>, records: &[IndexedRecord]) -> Result<(), TableError> {
    write_rows(path.as_ref(), records)
}

/// Reads `filtered_dashcam.csv`-style rows.
pub fn read_indexed(path: impl AsRef<Path>) -> Result<Vec<IndexedRecord>, TableError> {
    read_rows(path.as_ref())
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TableError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let csv_error = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote table");
    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TableError> {
    let csv_error = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_error)?;

    tracing::info!(path = %path.display(), rows = rows.len(), "Read table");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{Coordinates, Speed};

    fn sample() -> Vec<Record> {
        vec![
            Record::new(0, "08-04-2024 11:28:08", Coordinates::new(30.759489, -97.730664), &Speed::new(72, "MPH")),
            Record::new(3, "garbled, text", Coordinates::SENTINEL, &Speed::new(73, "MPH")),
        ]
    }

    #[test]
    fn test_header_matches_column_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/output/dashcam.csv");

        write_records(&path, &sample()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, "frame_index,timestamp,latitude,longitude,speed,speed_units");
        assert_eq!(read_records(&path).unwrap(), sample());
    }

    #[test]
    fn test_cleaned_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_dashcam.csv");
        let rows: Vec<IndexedRecord> = sample()
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_indexed(i as u64 * 3))
            .collect();

        write_indexed(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("new_index,timestamp,latitude,longitude,speed,speed_units\n"));
        assert_eq!(read_indexed(&path).unwrap(), rows);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_records(dir.path().join("absent.csv")),
            Err(TableError::Csv { .. })
        ));
    }
}
