//! Storage abstraction for String Analyzer.
//!
//! The [`StringStore`] trait covers every persistence operation the HTTP
//! layer needs. Each call is one unit of work: writes are single-row and
//! atomic, and nothing spans requests.
//!
//! Implementations must be `Send + Sync` to be shared across handlers.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::StringRecord;
use crate::query::StringFilter;

/// Errors surfaced by a [`StringStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the same content-derived id already exists.
    #[error("string already exists: {0}")]
    Conflict(String),

    /// The backend failed (connectivity, I/O, corrupt row).
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Abstract storage backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert`](StringStore::insert) | Store a new record, rejecting duplicate ids |
/// | [`find_by_value`](StringStore::find_by_value) | Exact lookup by the original string |
/// | [`delete_by_value`](StringStore::delete_by_value) | Remove the record holding a value |
/// | [`list`](StringStore::list) | All records accepted by a filter, oldest first |
#[async_trait]
pub trait StringStore: Send + Sync {
    /// Insert a record. Fails with [`StoreError::Conflict`] without
    /// changing state if `record.id` is already present.
    async fn insert(&self, record: &StringRecord) -> StoreResult<()>;

    async fn find_by_value(&self, value: &str) -> StoreResult<Option<StringRecord>>;

    /// Returns `false` when no record holds `value`.
    async fn delete_by_value(&self, value: &str) -> StoreResult<bool>;

    async fn list(&self, filter: &StringFilter) -> StoreResult<Vec<StringRecord>>;
}
