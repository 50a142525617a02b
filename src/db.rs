//! SQLite database connection management.
//!
//! The pool is built once at process start and handed to every request
//! handler; nothing holds it in a global.
//!
//! WAL mode is enabled so listing requests do not block on a concurrent
//! insert or delete. The database file and its parent directory are
//! created when missing. `sqlite::memory:` URLs get a single pinned
//! connection, since each SQLite in-memory connection is its own database.

use anyhow::{bail, Context, Result};
use log::LevelFilter;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;

/// How long a writer waits for the SQLite write lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Filesystem path of a `sqlite:` URL, or `None` for in-memory databases.
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path)
    }
}

/// Create a connection pool for the configured database URL.
///
/// # Errors
///
/// Returns an error for non-SQLite URLs, or if the database cannot be
/// created or opened.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let url = &config.db.url;
    if !url.starts_with("sqlite:") {
        let scheme = url.split(':').next().unwrap_or_default();
        bail!(
            "unsupported database scheme '{}': this build only supports sqlite: URLs",
            scheme
        );
    }

    let file = sqlite_file_path(url);
    if let Some(path) = file {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }
    }

    let mut options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid database URL: {}", url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    options = if config.db.echo_sql {
        options.log_statements(LevelFilter::Info)
    } else {
        options.disable_statement_logging()
    };

    let pool_options = if file.is_some() {
        SqlitePoolOptions::new().max_connections(config.db.max_connections)
    } else {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::debug!(url = %url, "database pool ready");
    Ok(pool)
}
