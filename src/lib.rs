//! # String Analyzer
//!
//! **An HTTP service that analyzes strings and lets clients filter what it has seen.**
//!
//! Each submitted string gets a fixed set of properties (length,
//! palindrome check, unique characters, word count, SHA-256 hash, and
//! a character-frequency histogram) and is stored keyed by its hash.
//! Stored strings can be fetched, deleted, and listed with structured
//! filters or one of a small set of natural-language phrases.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────────┐   ┌──────────┐
//! │   HTTP   │──▶│ Analyzer / Query     │──▶│  SQLite   │
//! │  (axum)  │   │ (string-analyzer-    │   │  strings  │
//! └──────────┘   │  core)               │   └──────────┘
//!                └──────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration plus `DATABASE_URL` / `SQL_ECHO` overrides |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Schema migrations (idempotent) |
//! | [`sqlite_store`] | SQLite implementation of [`StringStore`] |
//! | [`server`] | HTTP API (Axum) with CORS and request tracing |
//! | [`commands`] | CLI command bodies for the `strings` binary |
//!
//! Analysis, filtering, and the store trait live in
//! [`string_analyzer_core`] and are re-exported here.

pub mod commands;
pub mod config;
pub mod db;
pub mod migrate;
pub mod server;
pub mod sqlite_store;

pub use string_analyzer_core::{
    analyze, content_hash, interpret, models, query, store, Analysis, NaturalLanguageQuery,
    StringFilter, StringProperties, StringRecord, StringStore,
};
