//! Application layer: the two CLI workflows as library functions.
//!
//! Keeping the orchestration out of `main.rs` lets integration tests drive
//! full runs without spawning the binary.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::apply::{self, ApplyReport};
use crate::csv_import::{self, ImportSummary};
use crate::error::{CollectionError, Result};
use crate::storage;
use crate::validator::{self, AllocationWarning};

/// Outcome of one apply run
#[derive(Debug)]
pub struct RunSummary {
    pub report: ApplyReport,
    pub warnings: Vec<AllocationWarning>,
    /// Where the consumed batch was archived
    pub backup_path: PathBuf,
}

/// Apply one change batch against a data directory.
///
/// Load -> apply -> validate -> save -> archive. The only fatal conditions
/// are a missing batch file and unreadable/malformed inputs, all of which
/// abort before anything is written; everything else is warned and skipped
/// along the way.
pub fn run_apply(changes_path: &Path, data_dir: &Path) -> Result<RunSummary> {
    if !changes_path.exists() {
        return Err(CollectionError::ChangesNotFound {
            path: changes_path.to_path_buf(),
        });
    }

    info!("Loading changes from: {}", changes_path.display());
    info!("Data directory: {}", data_dir.display());

    let batch = storage::load_changes(changes_path)?;
    info!(
        "Changes timestamp: {}",
        batch.timestamp.as_deref().unwrap_or("unknown")
    );

    let mut store = storage::load_store(data_dir)?;
    let report = apply::apply_batch(&mut store, &batch);

    info!("Validating allocations:");
    let warnings = validator::validate_allocations(&store.collection, &store.decks, &store.binders);

    fs::create_dir_all(data_dir).map_err(|source| CollectionError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;
    storage::save_store(data_dir, &store)?;

    let backup_path = storage::archive_changes(changes_path)?;
    info!("Changes file backed up to: {}", backup_path.display());

    Ok(RunSummary {
        report,
        warnings,
        backup_path,
    })
}

/// Import an Archidekt CSV export into a fresh collection file.
///
/// When no CSV path is given, the output's directory is scanned for exactly
/// one `*.csv`.
pub fn run_import(csv_path: Option<PathBuf>, output_path: &Path) -> Result<ImportSummary> {
    let csv_path = match csv_path {
        Some(path) => path,
        None => {
            let data_dir = output_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            find_csv_in_dir(data_dir)?
        }
    };

    info!("Reading: {}", csv_path.display());
    info!("Output:  {}", output_path.display());

    let rows = csv_import::read_rows(&csv_path)?;
    let (collection, summary) = csv_import::build_collection(&rows);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CollectionError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    storage::write_json(output_path, &collection)?;

    info!(
        "Imported {} unique entries ({} total cards)",
        summary.unique_entries, summary.total_cards
    );
    for (finish, count) in &summary.finish_counts {
        info!("  {finish}: {count}");
    }
    info!("Written to {}", output_path.display());

    Ok(summary)
}

/// Find the single CSV file in a directory.
///
/// Zero or several candidates are errors; the candidate list is sorted so
/// the ambiguity message is stable.
pub fn find_csv_in_dir(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|source| CollectionError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CollectionError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_lowercase().ends_with(".csv") {
            candidates.push(name);
        }
    }
    candidates.sort();

    match candidates.len() {
        1 => Ok(dir.join(&candidates[0])),
        0 => Err(CollectionError::NoCsvFound {
            dir: dir.to_path_buf(),
        }),
        _ => Err(CollectionError::MultipleCsvFound {
            dir: dir.to_path_buf(),
            candidates,
        }),
    }
}
