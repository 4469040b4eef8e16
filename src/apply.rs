//! Applies one change batch to an in-memory record store.
//!
//! Changes are applied strictly in array order within each of the three
//! lists, so later changes observe the effects of earlier ones. Nothing
//! here touches persistence; every applied or skipped change produces one
//! progress line through the `log` facade.

use log::{info, warn};
use std::collections::HashMap;

use crate::changes::{BinderChange, ChangeBatch, CollectionChange, DeckChange};
use crate::models::{Binder, Collection, CollectionEntry, Deck};
use crate::storage::DataStore;

/// Applied/skipped counters for one dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetCounts {
    pub applied: usize,
    pub skipped: usize,
}

/// Outcome of applying one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub collection: DatasetCounts,
    pub decks: DatasetCounts,
    pub binders: DatasetCounts,
}

impl ApplyReport {
    pub fn total_applied(&self) -> usize {
        self.collection.applied + self.decks.applied + self.binders.applied
    }

    pub fn total_skipped(&self) -> usize {
        self.collection.skipped + self.decks.skipped + self.binders.skipped
    }
}

/// Apply a full batch to the store: collection first, then decks, then
/// binders, each list in order.
pub fn apply_batch(store: &mut DataStore, batch: &ChangeBatch) -> ApplyReport {
    let mut report = ApplyReport::default();

    if !batch.collection_changes.is_empty() {
        info!(
            "Applying {} collection change(s):",
            batch.collection_changes.len()
        );
        report.collection = apply_collection_changes(&mut store.collection, &batch.collection_changes);
    }

    if !batch.deck_changes.is_empty() {
        info!("Applying {} deck change(s):", batch.deck_changes.len());
        let ops = batch.deck_changes.iter().map(deck_op);
        report.decks = apply_list_changes("deck", &mut store.decks, ops);
    }

    if !batch.binder_changes.is_empty() {
        info!("Applying {} binder change(s):", batch.binder_changes.len());
        let ops = batch.binder_changes.iter().map(binder_op);
        report.binders = apply_list_changes("binder", &mut store.binders, ops);
    }

    report
}

fn apply_collection_changes(
    collection: &mut Collection,
    changes: &[CollectionChange],
) -> DatasetCounts {
    let mut counts = DatasetCounts::default();

    for change in changes {
        match change {
            CollectionChange::Add {
                scryfall_id,
                quantity,
                oracle_id,
                name,
                set,
                collector_number,
                finish,
            } => {
                if let Some(entry) = collection.get_mut(scryfall_id) {
                    entry.quantity += quantity;
                    info!("+ Updated quantity of {}: now {}", name, entry.quantity);
                } else {
                    collection.insert(
                        scryfall_id.clone(),
                        CollectionEntry {
                            quantity: *quantity,
                            oracle_id: oracle_id.clone(),
                            name: name.clone(),
                            set: set.clone(),
                            collector_number: collector_number.clone(),
                            finish: finish.clone(),
                        },
                    );
                    info!("+ Added {} ({}) x{}", name, set.to_uppercase(), quantity);
                }
                counts.applied += 1;
            }

            CollectionChange::UpdateQuantity {
                scryfall_id,
                new_quantity,
            } => {
                // Zero is a valid quantity, the entry stays
                if let Some(entry) = collection.get_mut(scryfall_id) {
                    let old_quantity = entry.quantity;
                    entry.quantity = *new_quantity;
                    info!(
                        "~ Updated {}: {} -> {}",
                        entry.name, old_quantity, new_quantity
                    );
                    counts.applied += 1;
                } else {
                    warn!("Cannot update quantity for {scryfall_id} (not in collection)");
                    counts.skipped += 1;
                }
            }

            CollectionChange::Remove { scryfall_id } => {
                if let Some(entry) = collection.remove(scryfall_id) {
                    info!("- Removed {}", entry.name);
                    counts.applied += 1;
                } else {
                    warn!("Cannot remove {scryfall_id} (not in collection)");
                    counts.skipped += 1;
                }
            }

            CollectionChange::Unrecognized { action } => {
                warn!("Unknown collection action: {action:?}");
                counts.skipped += 1;
            }
        }
    }

    counts
}

/// Decks and binders share the identical create/update/delete rule set, so
/// both change lists are normalized into these ops and applied by one
/// generic routine.
enum ListOp<'a, T> {
    Create(&'a T),
    Update { id: &'a str, record: &'a T },
    Delete { id: &'a str },
    Unrecognized(&'a str),
}

fn deck_op(change: &DeckChange) -> ListOp<'_, Deck> {
    match change {
        DeckChange::Create { deck } => ListOp::Create(deck),
        DeckChange::Update { deck_id, deck } => ListOp::Update {
            id: deck_id,
            record: deck,
        },
        DeckChange::Delete { deck_id } => ListOp::Delete { id: deck_id },
        DeckChange::Unrecognized { action } => ListOp::Unrecognized(action),
    }
}

fn binder_op(change: &BinderChange) -> ListOp<'_, Binder> {
    match change {
        BinderChange::Create { binder } => ListOp::Create(binder),
        BinderChange::Update { binder_id, binder } => ListOp::Update {
            id: binder_id,
            record: binder,
        },
        BinderChange::Delete { binder_id } => ListOp::Delete { id: binder_id },
        BinderChange::Unrecognized { action } => ListOp::Unrecognized(action),
    }
}

/// Ordered record with a unique id, as stored in `decks.json`/`binders.json`
trait ListRecord {
    fn id(&self) -> &str;
    fn display_name(&self) -> &str;
}

impl ListRecord for Deck {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

impl ListRecord for Binder {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

fn build_index<T: ListRecord>(records: &[T]) -> HashMap<String, usize> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| (record.id().to_string(), position))
        .collect()
}

fn apply_list_changes<'a, T, I>(kind: &str, records: &mut Vec<T>, ops: I) -> DatasetCounts
where
    T: ListRecord + Clone + 'a,
    I: IntoIterator<Item = ListOp<'a, T>>,
{
    let mut counts = DatasetCounts::default();
    let mut index = build_index(records);

    for op in ops {
        match op {
            ListOp::Create(record) => {
                if index.contains_key(record.id()) {
                    warn!(
                        "{kind} {} already exists, skipping create",
                        record.id()
                    );
                    counts.skipped += 1;
                } else {
                    records.push(record.clone());
                    index.insert(record.id().to_string(), records.len() - 1);
                    info!("+ Created {kind}: {}", record.display_name());
                    counts.applied += 1;
                }
            }

            ListOp::Update { id, record } => {
                if let Some(&position) = index.get(id) {
                    records[position] = record.clone();
                    info!("~ Updated {kind}: {}", records[position].display_name());
                    counts.applied += 1;
                } else {
                    warn!("{kind} {id} not found for update");
                    counts.skipped += 1;
                }
            }

            ListOp::Delete { id } => {
                if let Some(&position) = index.get(id) {
                    let name = records[position].display_name().to_string();
                    records.remove(position);
                    // positions after the removed record shifted
                    index = build_index(records);
                    info!("- Deleted {kind}: {name}");
                    counts.applied += 1;
                } else {
                    warn!("{kind} {id} not found for delete");
                    counts.skipped += 1;
                }
            }

            ListOp::Unrecognized(action) => {
                warn!("Unknown {kind} action: {action:?}");
                counts.skipped += 1;
            }
        }
    }

    counts
}
