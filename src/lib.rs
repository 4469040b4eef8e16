//! MTG Collection Data Layer
//!
//! Imports Archidekt CSV exports into a normalized `collection.json` and
//! applies change batches produced by the collection manager's web UI to
//! the collection, deck and binder data files.

pub mod app;
pub mod apply;
pub mod changes;
pub mod csv_import;
pub mod error;
pub mod models;
pub mod storage;
pub mod validator;

pub use app::{run_apply, run_import, RunSummary};
pub use apply::{apply_batch, ApplyReport, DatasetCounts};
pub use changes::{BinderChange, ChangeBatch, CollectionChange, DeckChange};
pub use csv_import::ImportSummary;
pub use error::{CollectionError, Result};
pub use models::{Binder, CardRef, Collection, CollectionEntry, Deck, Finish};
pub use storage::DataStore;
pub use validator::{validate_allocations, AllocationWarning};
