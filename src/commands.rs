//! CLI command bodies.
//!
//! Each command prints JSON matching the corresponding HTTP response, so
//! output can be piped into the same tooling.

use anyhow::{bail, Result};

use string_analyzer_core::analyze;
use string_analyzer_core::query::{interpret, StringFilter};
use string_analyzer_core::store::StringStore;

use crate::config::Config;
use crate::db;
use crate::migrate::run_migrations;
use crate::server::{ListResponse, NaturalLanguageResponse};
use crate::sqlite_store::SqliteStore;

pub async fn run_init(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    run_migrations(&pool).await?;
    pool.close().await;
    println!("Database initialized successfully.");
    Ok(())
}

/// Print the property bundle for `value` without storing it.
pub fn run_analyze(value: &str) -> Result<()> {
    let analysis = analyze(value);
    let out = serde_json::json!({
        "id": analysis.id,
        "value": value,
        "properties": analysis.properties,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// List stored strings, either by structured filter or by a
/// natural-language phrase. The two modes are exclusive.
pub async fn run_list(config: &Config, filter: StringFilter, query: Option<String>) -> Result<()> {
    if query.is_some() && !filter.is_empty() {
        bail!("--query cannot be combined with structured filters");
    }
    if let Err(msg) = filter.validate() {
        bail!(msg);
    }

    let pool = db::connect(config).await?;
    run_migrations(&pool).await?;
    let store = SqliteStore::new(pool.clone());

    let out = match query {
        Some(text) => {
            let (nl_filter, interpreted_query) = interpret(Some(&text));
            let data = store.list(&nl_filter).await?;
            serde_json::to_string_pretty(&NaturalLanguageResponse {
                count: data.len(),
                data,
                interpreted_query,
            })?
        }
        None => {
            let data = store.list(&filter).await?;
            serde_json::to_string_pretty(&ListResponse {
                count: data.len(),
                data,
                filters_applied: filter,
            })?
        }
    };

    pool.close().await;
    println!("{}", out);
    Ok(())
}
