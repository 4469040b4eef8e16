//! Deduplication-key resolution for ingested rows.
//!
//! Most Scryfall IDs map 1:1 to a single finish and keep the bare ID as
//! their key. When an ID appears with several finishes, the non-normal
//! rows get a composite `"<id>:<finish>"` key so foil and normal printings
//! keep separate quantities.

use std::collections::{BTreeSet, HashMap};

use super::CsvRow;
use crate::models::Finish;

/// Per-ID finish census over one import's rows.
///
/// Finishes are compared in canonical parsed form, so "Foil" and "foil"
/// count as one.
#[derive(Debug, Default)]
pub struct KeyResolver {
    finishes_by_id: HashMap<String, BTreeSet<Finish>>,
}

impl KeyResolver {
    /// Census pass: group rows by Scryfall ID and collect distinct finishes
    pub fn from_rows(rows: &[CsvRow]) -> Self {
        let mut finishes_by_id: HashMap<String, BTreeSet<Finish>> = HashMap::new();
        for row in rows {
            finishes_by_id
                .entry(row.scryfall_id.clone())
                .or_default()
                .insert(Finish::parse(&row.finish));
        }
        Self { finishes_by_id }
    }

    /// An ID is in conflict when it carries more than one distinct finish
    pub fn is_conflicted(&self, scryfall_id: &str) -> bool {
        self.finishes_by_id
            .get(scryfall_id)
            .map(|finishes| finishes.len() > 1)
            .unwrap_or(false)
    }

    /// Distinct finishes seen for an ID, in finish order
    pub fn finishes(&self, scryfall_id: &str) -> Vec<&Finish> {
        self.finishes_by_id
            .get(scryfall_id)
            .map(|finishes| finishes.iter().collect())
            .unwrap_or_default()
    }

    /// Conflicted IDs in deterministic order
    pub fn conflicts(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .finishes_by_id
            .iter()
            .filter(|(_, finishes)| finishes.len() > 1)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Resolved key for one row: composite only when the ID is in conflict
    /// and the row's finish is not normal
    pub fn resolve(&self, row: &CsvRow) -> String {
        let finish = Finish::parse(&row.finish);
        if self.is_conflicted(&row.scryfall_id) && !finish.is_normal() {
            format!("{}:{}", row.scryfall_id, finish)
        } else {
            row.scryfall_id.clone()
        }
    }
}

#[cfg(test)]
#[path = "key_resolver_tests.rs"]
mod tests;
