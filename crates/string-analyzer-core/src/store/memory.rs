//! In-memory [`StringStore`] implementation for tests and embedding.
//!
//! Records live in a `Vec` behind `std::sync::RwLock`, kept in insertion
//! order so listings match the SQLite backend's `created_at` ordering.

use std::sync::RwLock;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::models::StringRecord;
use crate::query::StringFilter;

use super::{StoreError, StoreResult, StringStore};

/// In-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<StringRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.records.read().map_err(|_| poisoned())?.len())
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend(anyhow!("in-memory store lock poisoned"))
}

#[async_trait]
impl StringStore for InMemoryStore {
    async fn insert(&self, record: &StringRecord) -> StoreResult<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Conflict(record.id.clone()));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn find_by_value(&self, value: &str) -> StoreResult<Option<StringRecord>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.iter().find(|r| r.value == value).cloned())
    }

    async fn delete_by_value(&self, value: &str) -> StoreResult<bool> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let before = records.len();
        records.retain(|r| r.value != value);
        Ok(records.len() != before)
    }

    async fn list(&self, filter: &StringFilter) -> StoreResult<Vec<StringRecord>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }
}
