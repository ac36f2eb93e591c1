use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use time::OffsetDateTime;

use super::RecordStore;
use crate::dataset::Dataset;
use crate::error::StoreError;
use crate::record::{Category, Identity, NewRecord, SavedRecord};

/// In-process store with the same contract as the remote one.
///
/// Clones share state. Used for demo sessions without a configured endpoint
/// and by tests, which can queue failures with [`MemoryStore::fail_next`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<(Identity, Category), SavedRecord>,
    queued_failures: VecDeque<StoreError>,
    calls: usize,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call (of any kind) fail with `err`.
    pub fn fail_next(&self, err: StoreError) {
        self.inner.borrow_mut().queued_failures.push_back(err);
    }

    /// Number of fetch/insert/update calls received so far.
    pub fn call_count(&self) -> usize {
        self.inner.borrow().calls
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().records.is_empty()
    }

    pub fn get(&self, identity: &Identity, category: Category) -> Option<SavedRecord> {
        self.inner
            .borrow()
            .records
            .get(&(identity.clone(), category))
            .cloned()
    }

    fn begin_call(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        match inner.queued_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl RecordStore for MemoryStore {
    async fn fetch(
        &self,
        identity: &Identity,
        category: Category,
    ) -> Result<Option<SavedRecord>, StoreError> {
        self.begin_call()?;
        Ok(self.get(identity, category))
    }

    async fn insert(&self, record: NewRecord) -> Result<SavedRecord, StoreError> {
        self.begin_call()?;
        let mut inner = self.inner.borrow_mut();
        let key = (record.identity.clone(), record.category);
        if inner.records.contains_key(&key) {
            return Err(StoreError::Duplicate {
                identity: record.identity.to_string(),
                category: record.category.to_string(),
            });
        }

        inner.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let saved = SavedRecord {
            id: Some(inner.next_id.to_string()),
            identity: record.identity,
            category: record.category,
            payload: record.payload,
            created_at: now,
            updated_at: now,
        };
        inner.records.insert(key, saved.clone());
        Ok(saved)
    }

    async fn update(
        &self,
        identity: &Identity,
        category: Category,
        payload: &Dataset,
        updated_at: OffsetDateTime,
    ) -> Result<SavedRecord, StoreError> {
        self.begin_call()?;
        let mut inner = self.inner.borrow_mut();
        let record = inner
            .records
            .get_mut(&(identity.clone(), category))
            .ok_or_else(|| StoreError::Missing {
                identity: identity.to_string(),
                category: category.to_string(),
            })?;
        record.payload = payload.clone();
        record.updated_at = updated_at;
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RateField;
    use futures::executor::block_on;
    use time::Duration;

    fn identity() -> Identity {
        Identity::parse("a@b.com").unwrap()
    }

    #[test]
    fn missing_record_is_none() {
        let store = MemoryStore::new();
        let found = block_on(store.fetch(&identity(), Category::CallSuccess)).unwrap();
        assert!(found.is_none());
        assert_eq!(store.call_count(), 1);
    }

    #[test]
    fn insert_then_fetch_round_trips_in_order() {
        let store = MemoryStore::new();
        let mut payload = Dataset::default();
        payload.set_rate(3, RateField::Failure, 40).unwrap();

        block_on(store.insert(NewRecord::new(
            identity(),
            Category::CallSuccess,
            payload.clone(),
        )))
        .unwrap();

        let fetched = block_on(store.fetch(&identity(), Category::CallSuccess))
            .unwrap()
            .unwrap();
        assert_eq!(fetched.payload, payload);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn second_insert_for_same_key_is_rejected() {
        let store = MemoryStore::new();
        let record = NewRecord::new(identity(), Category::CallSuccess, Dataset::default());
        block_on(store.insert(record.clone())).unwrap();
        let err = block_on(store.insert(record)).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_keeps_created_at_and_moves_updated_at() {
        let store = MemoryStore::new();
        let inserted = block_on(store.insert(NewRecord::new(
            identity(),
            Category::CallSuccess,
            Dataset::default(),
        )))
        .unwrap();

        let later = inserted.updated_at + Duration::minutes(5);
        let updated = block_on(store.update(
            &identity(),
            Category::CallSuccess,
            &Dataset::default(),
            later,
        ))
        .unwrap();
        assert_eq!(updated.created_at, inserted.created_at);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn update_without_record_is_an_error() {
        let store = MemoryStore::new();
        let err = block_on(store.update(
            &identity(),
            Category::CallSuccess,
            &Dataset::default(),
            OffsetDateTime::now_utc(),
        ))
        .unwrap_err();
        assert!(matches!(err, StoreError::Missing { .. }));
    }

    #[test]
    fn queued_failure_applies_to_one_call() {
        let store = MemoryStore::new();
        store.fail_next(StoreError::Transport("network down".into()));
        let err = block_on(store.fetch(&identity(), Category::CallSuccess)).unwrap_err();
        assert_eq!(err.to_string(), "network down");
        assert!(block_on(store.fetch(&identity(), Category::CallSuccess)).is_ok());
    }
}
