//! Data model for the collection, decks and binders.
//!
//! These types mirror the on-disk JSON artifacts exactly: `collection.json`
//! is an object of card key -> [`CollectionEntry`], while `decks.json` and
//! `binders.json` are arrays of [`Deck`] / [`Binder`] records.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Physical printing variant of a card.
///
/// Finishes other than the three known ones are preserved verbatim so an
/// export with a new variant round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Finish {
    Normal,
    Foil,
    Etched,
    Other(String),
}

impl Finish {
    /// Parse a finish name (case-insensitive, e.g. "Foil" from Archidekt)
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "normal" => Finish::Normal,
            "foil" => Finish::Foil,
            "etched" => Finish::Etched,
            other => Finish::Other(other.to_string()),
        }
    }

    /// Lowercase name as written into the JSON artifacts
    pub fn as_str(&self) -> &str {
        match self {
            Finish::Normal => "normal",
            Finish::Foil => "foil",
            Finish::Etched => "etched",
            Finish::Other(s) => s,
        }
    }

    /// The canonical finish that keeps a bare key even under a conflict
    pub fn is_normal(&self) -> bool {
        matches!(self, Finish::Normal)
    }
}

impl Default for Finish {
    fn default() -> Self {
        Finish::Normal
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Finish {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Finish {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Finish::parse(&s))
    }
}

/// Ownership of one printing/finish of a card.
///
/// The entry's key lives in the surrounding [`Collection`] map: either a
/// bare Scryfall ID or the composite `"<id>:<finish>"` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub quantity: u32,
    #[serde(default)]
    pub oracle_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub finish: Finish,
}

fn default_ref_quantity() -> u32 {
    1
}

fn default_binder_pages() -> u32 {
    9
}

/// A quantity of a card allocated into a deck or binder.
///
/// `board` is only present on deck refs (main/sideboard/maybe), `position`
/// only on binder refs (slot index); whichever does not apply is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRef {
    pub scryfall_id: String,
    #[serde(default = "default_ref_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cards: Vec<CardRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binder {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_binder_pages")]
    pub pages: u32,
    #[serde(default = "default_binder_pages")]
    pub slots_per_page: u32,
    #[serde(default)]
    pub cards: Vec<CardRef>,
}

/// The owned-card map, keyed by resolved card key.
///
/// Serialization always emits entries in canonical (name lowercase, set,
/// key) order, so every save of the same data is byte-identical regardless
/// of insertion history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    entries: HashMap<String, CollectionEntry>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CollectionEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut CollectionEntry> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: String, entry: CollectionEntry) -> Option<CollectionEntry> {
        self.entries.insert(key, entry)
    }

    pub fn remove(&mut self, key: &str) -> Option<CollectionEntry> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CollectionEntry)> {
        self.entries.iter()
    }

    /// Sum of owned quantities across all entries
    pub fn total_cards(&self) -> u64 {
        self.entries.values().map(|e| u64::from(e.quantity)).sum()
    }

    /// Entries in canonical order: (name lowercase, set, key).
    ///
    /// The key tie-break makes the order total for art variants that share
    /// name and set.
    pub fn sorted_entries(&self) -> Vec<(&String, &CollectionEntry)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|(ka, a), (kb, b)| {
            (a.name.to_lowercase(), &a.set, *ka).cmp(&(b.name.to_lowercase(), &b.set, *kb))
        });
        entries
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in self.sorted_entries() {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = Collection;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of card key to collection entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = HashMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, entry)) = access.next_entry::<String, CollectionEntry>()? {
                    entries.insert(key, entry);
                }
                Ok(Collection { entries })
            }
        }

        deserializer.deserialize_map(CollectionVisitor)
    }
}
