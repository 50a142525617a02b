//! Configuration loading.
//!
//! Settings come from an optional TOML file, then environment variables
//! override the database section:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `DATABASE_URL` | Replaces `[db].url`; `postgres://` is rewritten to `postgresql://` |
//! | `SQL_ECHO` | Boolean-like string replacing `[db].echo_sql` |
//!
//! ```toml
//! [db]
//! url = "sqlite://data/strings.sqlite"
//! echo_sql = false
//! max_connections = 5
//!
//! [server]
//! bind = "127.0.0.1:8000"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use string_analyzer_core::query::parse_bool_word;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const SQL_ECHO_ENV: &str = "SQL_ECHO";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_url")]
    pub url: String,
    /// Log every SQL statement at INFO.
    #[serde(default)]
    pub echo_sql: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            echo_sql: false,
            max_connections: default_max_connections(),
        }
    }
}

fn default_db_url() -> String {
    "sqlite://data/strings.sqlite".to_string()
}
fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

/// Rewrite the hosting-provider `postgres://` scheme to `postgresql://`.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{}", rest),
        None => url.to_string(),
    }
}

/// Boolean-like flag: the truthy words of [`parse_bool_word`]; everything
/// else, including unrecognized text, is off.
pub fn parse_bool_flag(value: &str) -> bool {
    parse_bool_word(value) == Some(true)
}

impl Config {
    /// Apply overrides from an environment lookup.
    ///
    /// Takes the lookup as a closure so tests need not touch the process
    /// environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.db.url = url;
        }
        if let Some(echo) = lookup(SQL_ECHO_ENV) {
            self.db.echo_sql = parse_bool_flag(&echo);
        }
        self.db.url = normalize_database_url(&self.db.url);
    }

    fn validate(&self) -> Result<()> {
        if self.db.url.trim().is_empty() {
            anyhow::bail!("db.url must not be empty");
        }
        if self.db.max_connections == 0 {
            anyhow::bail!("db.max_connections must be >= 1");
        }
        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }
        Ok(())
    }
}

/// Parse a TOML config string without consulting the environment.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path` (defaults when the file does not
/// exist), then apply environment overrides.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        parse_config(&content)?
    } else {
        Config::default()
    };

    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
