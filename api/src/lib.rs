//! Data layer for Voiceboard: the editable call-success dataset, the saved
//! record schema and the clients that read and write it.

pub mod config;
pub mod dataset;
pub mod error;
pub mod record;
pub mod store;

pub use config::{BackendKind, StoreConfig};
pub use dataset::{Dataset, DatasetEntry, RateField};
pub use error::{DatasetError, StoreError};
pub use record::{Category, Identity, IdentityError, NewRecord, SavedRecord};
pub use store::{MemoryStore, RecordStore, RestStore, StoreBackend};
