//! Record store clients.
//!
//! [`RecordStore`] is the contract the dashboard depends on: lookup, insert
//! and update keyed by (identity, category). A lookup that matches nothing is
//! `Ok(None)`; every other failure is a [`StoreError`]. Calls are made once,
//! with no retries.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use time::OffsetDateTime;

use crate::config::{BackendKind, StoreConfig};
use crate::dataset::Dataset;
use crate::error::StoreError;
use crate::record::{Category, Identity, NewRecord, SavedRecord};

#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn fetch(
        &self,
        identity: &Identity,
        category: Category,
    ) -> Result<Option<SavedRecord>, StoreError>;

    async fn insert(&self, record: NewRecord) -> Result<SavedRecord, StoreError>;

    async fn update(
        &self,
        identity: &Identity,
        category: Category,
        payload: &Dataset,
        updated_at: OffsetDateTime,
    ) -> Result<SavedRecord, StoreError>;
}

/// The store the UI is wired to, chosen once at startup.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Remote(RestStore),
    Memory(MemoryStore),
}

impl StoreBackend {
    pub fn from_env() -> Self {
        match BackendKind::from_env() {
            BackendKind::Memory => {
                tracing::info!("using in-memory record store");
                Self::Memory(MemoryStore::new())
            }
            BackendKind::Remote => {
                let config = StoreConfig::from_env();
                if !config.is_configured() {
                    tracing::warn!(
                        "record store endpoint not configured; saving will fail until it is"
                    );
                }
                Self::Remote(RestStore::new(config))
            }
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Memory(_))
    }
}

impl RecordStore for StoreBackend {
    async fn fetch(
        &self,
        identity: &Identity,
        category: Category,
    ) -> Result<Option<SavedRecord>, StoreError> {
        match self {
            Self::Remote(store) => store.fetch(identity, category).await,
            Self::Memory(store) => store.fetch(identity, category).await,
        }
    }

    async fn insert(&self, record: NewRecord) -> Result<SavedRecord, StoreError> {
        match self {
            Self::Remote(store) => store.insert(record).await,
            Self::Memory(store) => store.insert(record).await,
        }
    }

    async fn update(
        &self,
        identity: &Identity,
        category: Category,
        payload: &Dataset,
        updated_at: OffsetDateTime,
    ) -> Result<SavedRecord, StoreError> {
        match self {
            Self::Remote(store) => store.update(identity, category, payload, updated_at).await,
            Self::Memory(store) => store.update(identity, category, payload, updated_at).await,
        }
    }
}
