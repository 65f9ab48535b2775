use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use super::model::{LoadedFile, Row};
use crate::config::ClassifierConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("cannot open file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("no header row")]
    NoHeader,
}

/// A per-file load failure. Never aborts the rest of a batch.
#[derive(Debug, Error)]
#[error("failed to read {path}: {reason}")]
pub struct LoadError {
    pub path: String,
    #[source]
    pub reason: LoadFailure,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and classify every path independently.
///
/// Results come back in input order; a failure for one path has no effect
/// on the others.
pub fn load_files<P: AsRef<str>>(
    paths: &[P],
    config: &ClassifierConfig,
) -> Vec<Result<LoadedFile, LoadError>> {
    paths
        .iter()
        .map(|p| load_file(p.as_ref(), config))
        .collect()
}

/// Load and classify one CSV file.
pub fn load_file(path: &str, config: &ClassifierConfig) -> Result<LoadedFile, LoadError> {
    match read_csv(Path::new(path)) {
        Ok((header, rows)) => {
            let file = LoadedFile::new(path, header, rows, config);
            log::info!(
                "Loaded {} ({} rows, schema {}, category {})",
                path,
                file.len(),
                file.schema,
                file.category
            );
            Ok(file)
        }
        Err(reason) => {
            log::warn!("Failed to load {path}: {reason}");
            Err(LoadError {
                path: path.to_string(),
                reason,
            })
        }
    }
}

/// All `*.csv` files below `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .map(|e| e.into_path())
        .collect();
    out.sort();
    log::debug!("Found {} CSV files under {}", out.len(), dir.display());
    out
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Read the header and all records into memory.
///
/// Records may be shorter or longer than the header: missing trailing cells
/// are absent from the row, extra cells are dropped.
fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Row>), LoadFailure> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let header: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadFailure::NoHeader);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Row = header
            .iter()
            .cloned()
            .zip(record.iter().map(|v| v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok((header, rows))
}
