//! Error types for the collection data layer.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for collection operations.
///
/// Only the conditions listed here abort a run; everything else (unknown
/// actions, missing keys, over-allocations) is warned and skipped at the
/// point of detection.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// File could not be read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exists but is not valid JSON for its expected shape
    #[error("failed to parse JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// CSV export could not be read or a row failed to parse
    #[error("failed to parse CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The change batch path does not exist
    #[error("changes file not found: {}", .path.display())]
    ChangesNotFound { path: PathBuf },

    /// CSV auto-detection found nothing to import
    #[error("no CSV files found in {}", .dir.display())]
    NoCsvFound { dir: PathBuf },

    /// CSV auto-detection is ambiguous
    #[error("multiple CSV files found in {}: {}", .dir.display(), .candidates.join(", "))]
    MultipleCsvFound {
        dir: PathBuf,
        candidates: Vec<String>,
    },
}

/// Result alias for collection operations
pub type Result<T> = std::result::Result<T, CollectionError>;
