//! SQLite-backed [`StringStore`] implementation.
//!
//! One row per distinct value in the `strings` table. The property
//! bundle is stored as JSON text and decoded into the typed
//! [`StringProperties`] on read; filters then run against those fields.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use string_analyzer_core::models::{StringProperties, StringRecord};
use string_analyzer_core::query::StringFilter;
use string_analyzer_core::store::{StoreError, StoreResult, StringStore};

/// SQLite implementation of the [`StringStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.into())
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_record(row: &SqliteRow) -> anyhow::Result<StringRecord> {
    let id: String = row.try_get("id")?;
    let properties_json: String = row.try_get("properties")?;
    let created_at: String = row.try_get("created_at")?;

    let properties: StringProperties = serde_json::from_str(&properties_json)
        .with_context(|| format!("corrupt properties for string {}", id))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .with_context(|| format!("corrupt created_at for string {}", id))?
        .with_timezone(&Utc);

    Ok(StringRecord {
        id,
        value: row.try_get("value")?,
        properties,
        created_at,
    })
}

#[async_trait]
impl StringStore for SqliteStore {
    async fn insert(&self, record: &StringRecord) -> StoreResult<()> {
        let properties =
            serde_json::to_string(&record.properties).map_err(anyhow::Error::from)?;

        // autocommit; the primary key arbitrates concurrent writers
        let inserted = sqlx::query(
            "INSERT INTO strings (id, value, properties, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.value)
        .bind(&properties)
        .bind(format_ts(&record.created_at))
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => {
                tracing::debug!(id = %record.id, "stored string");
                Ok(())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Conflict(record.id.clone()))
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn find_by_value(&self, value: &str) -> StoreResult<Option<StringRecord>> {
        let row = sqlx::query(
            "SELECT id, value, properties, created_at FROM strings WHERE value = ? LIMIT 1",
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        match row {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_by_value(&self, value: &str) -> StoreResult<bool> {
        // at most one row per value, since the id is a hash of it
        let result = sqlx::query("DELETE FROM strings WHERE value = ?")
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(value_len = value.len(), "deleted string");
        }
        Ok(deleted)
    }

    async fn list(&self, filter: &StringFilter) -> StoreResult<Vec<StringRecord>> {
        let rows = sqlx::query(
            "SELECT id, value, properties, created_at FROM strings ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let record = row_to_record(row)?;
            if filter.matches(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }
}
