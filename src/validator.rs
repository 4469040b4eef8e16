//! Allocation validation over the full record store.
//!
//! Run after a batch has been applied: checks that decks and binders never
//! claim more copies of a card than the collection owns. Advisory only, it
//! never blocks persistence and never mutates data.

use log::{info, warn};
use std::collections::BTreeMap;

use crate::models::{Binder, Collection, Deck};

/// One over-allocation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationWarning {
    /// Resolved card key
    pub key: String,
    /// Card name if owned, else the key itself
    pub name: String,
    pub owned: u32,
    pub allocated: u32,
}

/// Sum allocations per key across every deck and binder and report every
/// key claiming more than is owned, in key order.
///
/// A key absent from the collection counts as owned 0.
pub fn validate_allocations(
    collection: &Collection,
    decks: &[Deck],
    binders: &[Binder],
) -> Vec<AllocationWarning> {
    // BTreeMap keeps the findings in deterministic key order
    let mut allocations: BTreeMap<&str, u32> = BTreeMap::new();

    for deck in decks {
        for card in &deck.cards {
            *allocations.entry(&card.scryfall_id).or_default() += card.quantity;
        }
    }
    for binder in binders {
        for card in &binder.cards {
            *allocations.entry(&card.scryfall_id).or_default() += card.quantity;
        }
    }

    let mut warnings = Vec::new();
    for (key, allocated) in allocations {
        let entry = collection.get(key);
        let owned = entry.map(|e| e.quantity).unwrap_or(0);
        if allocated > owned {
            let name = entry
                .map(|e| e.name.clone())
                .unwrap_or_else(|| key.to_string());
            warn!("Over-allocated: {name} - own {owned}, assigned {allocated}");
            warnings.push(AllocationWarning {
                key: key.to_string(),
                name,
                owned,
                allocated,
            });
        }
    }

    if warnings.is_empty() {
        info!("All allocations valid.");
    } else {
        warn!("{} over-allocation warning(s).", warnings.len());
    }

    warnings
}
