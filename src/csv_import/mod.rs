//! Archidekt CSV ingestion.
//!
//! Builds an initial collection from an Archidekt export. The interesting
//! part lives in [`key_resolver`]: when the same Scryfall ID appears with
//! multiple finishes, the non-normal rows get composite `id:finish` keys so
//! their quantities stay separate.
//!
//! # Module Structure
//!
//! - [`key_resolver`] - Deduplication-key resolution for ingested rows

pub mod key_resolver;

use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CollectionError, Result};
use crate::models::{Collection, CollectionEntry, Finish};
use self::key_resolver::KeyResolver;

/// One row of an Archidekt export, bound by header name.
///
/// Extra columns in the export are ignored; column order is free.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Finish")]
    pub finish: String,
    #[serde(rename = "Edition Code")]
    pub edition_code: String,
    #[serde(rename = "Scryfall ID")]
    pub scryfall_id: String,
    #[serde(rename = "Collector Number")]
    pub collector_number: String,
}

/// What an import run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Distinct resolved keys in the built collection
    pub unique_entries: usize,
    /// Sum of owned quantities
    pub total_cards: u64,
    /// Owned quantity per finish name, in finish-name order
    pub finish_counts: BTreeMap<String, u64>,
    /// Rows folded into an already-present key
    pub merged_duplicates: usize,
    /// Scryfall IDs seen with more than one finish
    pub conflicts: usize,
}

/// Read all rows of an Archidekt export
pub fn read_rows(path: &Path) -> Result<Vec<CsvRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CollectionError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result.map_err(|source| CollectionError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Build a collection from ingested rows.
///
/// Rows resolving to the same key have their quantities summed. The
/// returned collection sorts itself on serialization, so build order does
/// not matter.
pub fn build_collection(rows: &[CsvRow]) -> (Collection, ImportSummary) {
    let resolver = KeyResolver::from_rows(rows);

    let conflicts = resolver.conflicts();
    if !conflicts.is_empty() {
        warn!(
            "Found {} card(s) with multiple finishes for same ID:",
            conflicts.len()
        );
        for scryfall_id in &conflicts {
            let name = rows
                .iter()
                .find(|r| &r.scryfall_id == scryfall_id)
                .map(|r| r.name.as_str())
                .unwrap_or("");
            let finishes: Vec<&str> = resolver
                .finishes(scryfall_id)
                .iter()
                .map(|f| f.as_str())
                .collect();
            warn!("  {name} ({scryfall_id}): {finishes:?}");
        }
    }

    let mut collection = Collection::new();
    let mut merged_duplicates = 0;
    for row in rows {
        let key = resolver.resolve(row);
        if let Some(entry) = collection.get_mut(&key) {
            entry.quantity += row.quantity;
            merged_duplicates += 1;
            info!("Merged duplicate: {} ({key})", row.name);
        } else {
            collection.insert(
                key,
                CollectionEntry {
                    quantity: row.quantity,
                    oracle_id: String::new(),
                    name: row.name.clone(),
                    set: row.edition_code.to_lowercase(),
                    collector_number: row.collector_number.clone(),
                    finish: Finish::parse(&row.finish),
                },
            );
        }
    }

    let mut finish_counts: BTreeMap<String, u64> = BTreeMap::new();
    for (_, entry) in collection.iter() {
        *finish_counts.entry(entry.finish.as_str().to_string()).or_default() +=
            u64::from(entry.quantity);
    }

    let summary = ImportSummary {
        unique_entries: collection.len(),
        total_cards: collection.total_cards(),
        finish_counts,
        merged_duplicates,
        conflicts: conflicts.len(),
    };
    (collection, summary)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
