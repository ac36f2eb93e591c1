//! The store calls the flow needs, one attempt each.

use api::{NewRecord, RecordStore, SavedRecord, StoreError};
use time::OffsetDateTime;
use tracing::{info, warn};

use super::machine::{ResolveRequest, SaveKind, SaveRequest};

/// Look up the saved dataset for the requested identity.
pub async fn resolve<S: RecordStore>(
    store: &S,
    request: &ResolveRequest,
) -> Result<Option<SavedRecord>, StoreError> {
    let result = store.fetch(&request.identity, request.category).await;
    match &result {
        Ok(Some(_)) => info!(identity = %request.identity, "found saved dataset"),
        Ok(None) => info!(identity = %request.identity, "no saved dataset; using defaults"),
        Err(err) => warn!(identity = %request.identity, error = %err, "lookup failed"),
    }
    result
}

/// Insert or update, as decided when the save was submitted.
pub async fn persist<S: RecordStore>(
    store: &S,
    request: &SaveRequest,
    now: OffsetDateTime,
) -> Result<SavedRecord, StoreError> {
    let result = match request.kind {
        SaveKind::Insert => {
            store
                .insert(NewRecord::new(
                    request.identity.clone(),
                    request.category,
                    request.payload.clone(),
                ))
                .await
        }
        SaveKind::Update => {
            store
                .update(&request.identity, request.category, &request.payload, now)
                .await
        }
    };
    match &result {
        Ok(_) => info!(identity = %request.identity, kind = ?request.kind, "dataset saved"),
        Err(err) => warn!(identity = %request.identity, error = %err, "save failed"),
    }
    result
}
