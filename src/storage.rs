//! Persistence gateway: the three JSON artifacts plus change-batch
//! consumption.
//!
//! Missing artifacts load as typed empty values (implicit first-run
//! bootstrap); present-but-malformed files are errors. All writes are
//! human-formatted: 2-space indent, UTF-8, trailing newline.

use chrono::Local;
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::changes::ChangeBatch;
use crate::error::{CollectionError, Result};
use crate::models::{Binder, Collection, Deck};

pub const COLLECTION_FILE: &str = "collection.json";
pub const DECKS_FILE: &str = "decks.json";
pub const BINDERS_FILE: &str = "binders.json";

/// In-memory record store: the three artifacts of one data directory
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    pub collection: Collection,
    pub decks: Vec<Deck>,
    pub binders: Vec<Binder>,
}

/// Load one artifact, synthesizing its empty value when the file is absent
fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let text = fs::read_to_string(path).map_err(|source| CollectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CollectionError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize with 2-space indent and a trailing newline
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value).map_err(|source| CollectionError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(|source| CollectionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the full record store from a data directory
pub fn load_store(data_dir: &Path) -> Result<DataStore> {
    Ok(DataStore {
        collection: load_or_default(&data_dir.join(COLLECTION_FILE))?,
        decks: load_or_default(&data_dir.join(DECKS_FILE))?,
        binders: load_or_default(&data_dir.join(BINDERS_FILE))?,
    })
}

/// Write all three artifacts back.
///
/// The collection re-sorts itself on serialization; decks and binders keep
/// their list order since it may carry UI meaning. There is no transaction
/// across the three files; the data directory is expected to live under
/// version control for recovery.
pub fn save_store(data_dir: &Path, store: &DataStore) -> Result<()> {
    write_json(&data_dir.join(COLLECTION_FILE), &store.collection)?;
    write_json(&data_dir.join(DECKS_FILE), &store.decks)?;
    write_json(&data_dir.join(BINDERS_FILE), &store.binders)?;
    info!("Data files updated successfully.");
    Ok(())
}

/// Read and parse a change batch file
pub fn load_changes(path: &Path) -> Result<ChangeBatch> {
    let text = fs::read_to_string(path).map_err(|source| CollectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CollectionError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Rename a consumed batch to `changes_<YYYYMMDD>_<HHMMSS>.json` next to
/// the original, so it cannot be reapplied under its old name and the run
/// leaves an audit trail.
pub fn archive_changes(changes_path: &Path) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_name = format!("changes_{stamp}.json");
    let backup_path = changes_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(backup_name);
    fs::rename(changes_path, &backup_path).map_err(|source| CollectionError::Io {
        path: changes_path.to_path_buf(),
        source,
    })?;
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionEntry, Finish};
    use tempfile::TempDir;

    #[test]
    fn missing_artifacts_load_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = load_store(dir.path()).unwrap();
        assert!(store.collection.is_empty());
        assert!(store.decks.is_empty());
        assert!(store.binders.is_empty());
    }

    #[test]
    fn malformed_artifact_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(COLLECTION_FILE), "{ not json").unwrap();
        let err = load_store(dir.path()).unwrap_err();
        assert!(matches!(err, CollectionError::Json { .. }));
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = DataStore::default();
        store.collection.insert(
            "a".to_string(),
            CollectionEntry {
                quantity: 2,
                oracle_id: String::new(),
                name: "Sol Ring".to_string(),
                set: "c21".to_string(),
                collector_number: "263".to_string(),
                finish: Finish::Foil,
            },
        );
        save_store(dir.path(), &store).unwrap();

        let reloaded = load_store(dir.path()).unwrap();
        assert_eq!(reloaded.collection.get("a"), store.collection.get("a"));
    }

    #[test]
    fn written_files_end_with_newline() {
        let dir = TempDir::new().unwrap();
        save_store(dir.path(), &DataStore::default()).unwrap();
        let text = fs::read_to_string(dir.path().join(DECKS_FILE)).unwrap();
        assert_eq!(text, "[]\n");
    }

    #[test]
    fn archive_renames_next_to_original() {
        let dir = TempDir::new().unwrap();
        let changes_path = dir.path().join("changes.json");
        fs::write(&changes_path, "{}\n").unwrap();

        let backup_path = archive_changes(&changes_path).unwrap();
        assert!(!changes_path.exists());
        assert!(backup_path.exists());
        assert_eq!(backup_path.parent().unwrap(), dir.path());
        let backup_name = backup_path.file_name().unwrap().to_string_lossy();
        assert!(backup_name.starts_with("changes_"));
        assert!(backup_name.ends_with(".json"));
        assert_eq!(fs::read_to_string(&backup_path).unwrap(), "{}\n");
    }
}
