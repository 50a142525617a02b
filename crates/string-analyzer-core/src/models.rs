//! Core data models.
//!
//! A [`StringRecord`] is the only persisted entity. Its property bundle is
//! a fixed struct rather than an open JSON map, so filters compare typed
//! fields directly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyze::analyze;

/// Descriptive properties computed for a string.
///
/// Serialized as the JSON bundle stored in the `properties` column and
/// returned over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringProperties {
    /// Number of Unicode scalar values.
    pub length: usize,
    /// Exact (case-sensitive) equality with the character-reversed value.
    pub is_palindrome: bool,
    /// Distinct characters in the lowercased value.
    pub unique_characters: usize,
    /// Number of segments produced by splitting on `' '`.
    pub word_count: usize,
    /// Lowercase hex SHA-256 of the UTF-8 bytes; same as the record id.
    pub sha256_hash: String,
    /// Occurrence count per character of the lowercased value.
    pub character_frequency_map: BTreeMap<char, usize>,
}

/// A stored string together with its properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringRecord {
    pub id: String,
    pub value: String,
    pub properties: StringProperties,
    pub created_at: DateTime<Utc>,
}

impl StringRecord {
    /// Analyze `value` and stamp the record with the current time.
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_created_at(value, Utc::now())
    }

    pub fn with_created_at(value: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let value = value.into();
        let analysis = analyze(&value);
        Self {
            id: analysis.id,
            value,
            properties: analysis.properties,
            created_at,
        }
    }
}
