//! Wire model for `changes.json` batches exported by the web UI.
//!
//! Each change object carries an `action` tag plus an action-specific
//! payload. Unknown tags, and known tags whose payload cannot be decoded,
//! fall back to the `Unrecognized` variant so a newer UI never aborts an
//! older applier: the change is warned about and skipped at apply time.

use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

use crate::models::{Binder, Deck, Finish};

/// One unit of work: ordered change lists for the three datasets.
///
/// A batch file is consumed exactly once; after a successful run it is
/// renamed to a timestamped backup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeBatch {
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Export format version written by the web UI; accepted and ignored
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub collection_changes: Vec<CollectionChange>,
    #[serde(default)]
    pub deck_changes: Vec<DeckChange>,
    #[serde(default)]
    pub binder_changes: Vec<BinderChange>,
}

impl ChangeBatch {
    pub fn is_empty(&self) -> bool {
        self.collection_changes.is_empty()
            && self.deck_changes.is_empty()
            && self.binder_changes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionChange {
    Add {
        scryfall_id: String,
        quantity: u32,
        oracle_id: String,
        name: String,
        set: String,
        collector_number: String,
        finish: Finish,
    },
    UpdateQuantity {
        scryfall_id: String,
        new_quantity: u32,
    },
    Remove {
        scryfall_id: String,
    },
    Unrecognized {
        action: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeckChange {
    Create { deck: Deck },
    Update { deck_id: String, deck: Deck },
    Delete { deck_id: String },
    Unrecognized { action: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BinderChange {
    Create { binder: Binder },
    Update { binder_id: String, binder: Binder },
    Delete { binder_id: String },
    Unrecognized { action: String },
}

fn default_add_quantity() -> u32 {
    1
}

/// `add` payload: the web UI omits `finish` (defaults normal) and may omit
/// quantity (defaults 1)
#[derive(Deserialize)]
struct AddPayload {
    scryfall_id: String,
    #[serde(default = "default_add_quantity")]
    quantity: u32,
    #[serde(default)]
    oracle_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    set: String,
    #[serde(default)]
    collector_number: String,
    #[serde(default)]
    finish: Finish,
}

#[derive(Deserialize)]
struct UpdateQuantityPayload {
    scryfall_id: String,
    new_quantity: u32,
}

#[derive(Deserialize)]
struct RemovePayload {
    scryfall_id: String,
}

#[derive(Deserialize)]
struct DeckCreatePayload {
    deck: Deck,
}

#[derive(Deserialize)]
struct DeckUpdatePayload {
    deck_id: String,
    deck: Deck,
}

#[derive(Deserialize)]
struct DeckDeletePayload {
    deck_id: String,
}

#[derive(Deserialize)]
struct BinderCreatePayload {
    binder: Binder,
}

#[derive(Deserialize)]
struct BinderUpdatePayload {
    binder_id: String,
    binder: Binder,
}

#[derive(Deserialize)]
struct BinderDeletePayload {
    binder_id: String,
}

/// Pull the raw `action` tag out of a change object; missing or non-string
/// tags become the empty string and land in `Unrecognized`
fn action_tag(value: &Value) -> String {
    value
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

impl<'de> Deserialize<'de> for CollectionChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let action = action_tag(&value);
        let parsed = match action.as_str() {
            "add" => serde_json::from_value::<AddPayload>(value).ok().map(|p| {
                CollectionChange::Add {
                    scryfall_id: p.scryfall_id,
                    quantity: p.quantity,
                    oracle_id: p.oracle_id,
                    name: p.name,
                    set: p.set,
                    collector_number: p.collector_number,
                    finish: p.finish,
                }
            }),
            "update_quantity" => serde_json::from_value::<UpdateQuantityPayload>(value)
                .ok()
                .map(|p| CollectionChange::UpdateQuantity {
                    scryfall_id: p.scryfall_id,
                    new_quantity: p.new_quantity,
                }),
            "remove" => serde_json::from_value::<RemovePayload>(value)
                .ok()
                .map(|p| CollectionChange::Remove {
                    scryfall_id: p.scryfall_id,
                }),
            _ => None,
        };
        Ok(parsed.unwrap_or(CollectionChange::Unrecognized { action }))
    }
}

impl<'de> Deserialize<'de> for DeckChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let action = action_tag(&value);
        let parsed = match action.as_str() {
            "create" => serde_json::from_value::<DeckCreatePayload>(value)
                .ok()
                .map(|p| DeckChange::Create { deck: p.deck }),
            "update" => serde_json::from_value::<DeckUpdatePayload>(value)
                .ok()
                .map(|p| DeckChange::Update {
                    deck_id: p.deck_id,
                    deck: p.deck,
                }),
            "delete" => serde_json::from_value::<DeckDeletePayload>(value)
                .ok()
                .map(|p| DeckChange::Delete { deck_id: p.deck_id }),
            _ => None,
        };
        Ok(parsed.unwrap_or(DeckChange::Unrecognized { action }))
    }
}

impl<'de> Deserialize<'de> for BinderChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let action = action_tag(&value);
        let parsed = match action.as_str() {
            "create" => serde_json::from_value::<BinderCreatePayload>(value)
                .ok()
                .map(|p| BinderChange::Create { binder: p.binder }),
            "update" => serde_json::from_value::<BinderUpdatePayload>(value)
                .ok()
                .map(|p| BinderChange::Update {
                    binder_id: p.binder_id,
                    binder: p.binder,
                }),
            "delete" => serde_json::from_value::<BinderDeletePayload>(value)
                .ok()
                .map(|p| BinderChange::Delete {
                    binder_id: p.binder_id,
                }),
            _ => None,
        };
        Ok(parsed.unwrap_or(BinderChange::Unrecognized { action }))
    }
}
