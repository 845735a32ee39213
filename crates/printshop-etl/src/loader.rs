//! Load stage.
//!
//! Writes a table as CSV. Output goes to a temporary sibling file that is
//! renamed over the destination once complete, so a reader never sees a
//! partially written file.

use crate::error::{EtlError, Result};
use crate::pipeline::{EtlStage, ProgressUpdate, SharedReporter, default_reporter};
use crate::table::Table;
use crate::utils::TIMESTAMP_OUTPUT_FORMAT;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persists tables to CSV files.
pub struct Loader {
    reporter: SharedReporter,
}

impl Loader {
    pub fn new(reporter: SharedReporter) -> Self {
        Self { reporter }
    }

    /// Create the directory that will hold `destination`, if missing.
    ///
    /// Safe to call repeatedly. Returns the directory.
    pub fn initialize(&self, destination: &Path) -> Result<PathBuf> {
        let dir = parent_dir(destination);
        fs::create_dir_all(&dir).map_err(|e| EtlError::persistence(&dir, e))?;
        debug!("Output directory ready: {}", dir.display());
        Ok(dir)
    }

    /// Write `table` to `destination` as CSV and return the canonical path.
    ///
    /// An existing file at `destination` is replaced. On failure the
    /// destination is left as it was.
    pub fn load(&self, table: &Table, destination: &Path) -> Result<PathBuf> {
        if destination.is_dir() {
            return Err(EtlError::persistence(
                destination,
                "destination is a directory",
            ));
        }
        let file_name = destination
            .file_name()
            .ok_or_else(|| EtlError::persistence(destination, "destination has no file name"))?;
        let temp_path =
            parent_dir(destination).join(format!(".{}.tmp", file_name.to_string_lossy()));

        self.reporter.report(ProgressUpdate::new(
            EtlStage::Load,
            0.0,
            format!("Writing {} rows to {}", table.height(), destination.display()),
        ));

        if let Err(e) = write_csv(table, &temp_path) {
            discard(&temp_path);
            return Err(EtlError::persistence(destination, e));
        }
        if let Err(e) = fs::rename(&temp_path, destination) {
            discard(&temp_path);
            return Err(EtlError::persistence(destination, e));
        }

        let path =
            fs::canonicalize(destination).map_err(|e| EtlError::persistence(destination, e))?;

        self.reporter.report(ProgressUpdate::new(
            EtlStage::Load,
            1.0,
            format!("Dataset saved: {}", path.display()),
        ));
        Ok(path)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(default_reporter())
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn write_csv(table: &Table, path: &Path) -> std::result::Result<(), String> {
    let mut file = File::create(path).map_err(|e| e.to_string())?;
    let mut frame = table.frame().clone();

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .with_datetime_format(Some(TIMESTAMP_OUTPUT_FORMAT.to_string()))
        .finish(&mut frame)
        .map_err(|e| e.to_string())?;

    file.sync_all().map_err(|e| e.to_string())
}

fn discard(temp_path: &Path) {
    if temp_path.exists()
        && let Err(e) = fs::remove_file(temp_path)
    {
        warn!("Failed to remove {}: {}", temp_path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentReporter;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn loader() -> Loader {
        Loader::new(Arc::new(SilentReporter))
    }

    fn small_table() -> Table {
        let stamps = Series::new("request_timestamp".into(), &[1_672_531_200_000i64, 1_672_534_800_000])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        Table::new(vec![
            Series::new("id".into(), &["TRB-00001", "TRB-00002"]),
            stamps,
            Series::new("department".into(), &["Unknown", "Library, Archives"]),
            Series::new("cost_per_page".into(), &[10.0, 2.5]),
        ])
        .unwrap()
    }

    #[test]
    fn test_initialize_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("data").join("processed").join("jobs.csv");

        let created = loader().initialize(&destination).unwrap();
        assert!(created.is_dir());

        // Idempotent
        loader().initialize(&destination).unwrap();
        assert!(!destination.exists());
    }

    #[test]
    fn test_load_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("jobs.csv");

        let path = loader().load(&small_table(), &destination).unwrap();

        assert_eq!(path, fs::canonicalize(&destination).unwrap());
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "id,request_timestamp,department,cost_per_page");
        assert_eq!(lines[1], "TRB-00001,2023-01-01T00:00:00,Unknown,10.0");
        assert_eq!(lines[2], "TRB-00002,2023-01-01T01:00:00,\"Library, Archives\",2.5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_load_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("jobs.csv");

        loader().load(&small_table(), &destination).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_load_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("jobs.csv");
        fs::write(&destination, "stale").unwrap();

        loader().load(&small_table(), &destination).unwrap();

        assert!(fs::read_to_string(&destination).unwrap().starts_with("id,"));
    }

    #[test]
    fn test_load_without_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("missing").join("jobs.csv");

        let error = loader().load(&small_table(), &destination).unwrap_err();

        assert!(matches!(error, EtlError::Persistence { .. }));
        assert_eq!(error.stage(), Some(EtlStage::Load));
        assert!(!destination.exists());
    }

    #[test]
    fn test_load_into_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let error = loader().load(&small_table(), dir.path()).unwrap_err();
        assert!(matches!(error, EtlError::Persistence { .. }));
    }

    #[test]
    fn test_load_does_not_modify_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = small_table();
        let before = table.clone();

        loader().load(&table, &dir.path().join("jobs.csv")).unwrap();

        assert!(table.equals(&before));
    }
}
