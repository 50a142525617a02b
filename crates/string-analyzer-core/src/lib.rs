//! # String Analyzer Core
//!
//! Shared logic for String Analyzer: the typed property bundle, the
//! analyzer that computes it, the query interpreter (structured filters
//! and the fixed natural-language phrase table), and the store
//! abstraction.
//!
//! This crate contains no tokio, sqlx, or other I/O dependencies.

pub mod analyze;
pub mod models;
pub mod query;
pub mod store;

pub use analyze::{analyze, content_hash, Analysis};
pub use models::{StringProperties, StringRecord};
pub use query::{
    interpret, parse_bool_word, InterpretedQuery, NaturalLanguageQuery, ParsedFilters, StringFilter,
};
pub use store::{StoreError, StringStore};
