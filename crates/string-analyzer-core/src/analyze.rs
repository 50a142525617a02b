//! String analysis.
//!
//! [`analyze`] is total over all strings: it never fails and has no side
//! effects. The id it returns is the lowercase hex SHA-256 digest of the
//! value's UTF-8 bytes, so equal values always map to the same id.

use std::collections::{BTreeMap, HashSet};

use sha2::{Digest, Sha256};

use crate::models::StringProperties;

/// Result of analyzing a string: the content-derived id and the property bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub id: String,
    pub properties: StringProperties,
}

/// Lowercase hex SHA-256 of the UTF-8 encoding of `value`.
pub fn content_hash(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Compute the property bundle and id for `value`.
///
/// - `length` counts Unicode scalar values, not bytes.
/// - `is_palindrome` compares against the character reverse, case-sensitive.
/// - `unique_characters` and `character_frequency_map` work on the
///   lowercased value. Characters whose lowercase form expands to several
///   scalars contribute each of them.
/// - `word_count` splits on `' '` only, keeping empty segments, so `""`
///   has one word and `"a  b"` has three.
pub fn analyze(value: &str) -> Analysis {
    let length = value.chars().count();
    let is_palindrome = value.chars().eq(value.chars().rev());

    let mut seen = HashSet::new();
    let mut character_frequency_map = BTreeMap::new();
    for c in value.chars().flat_map(char::to_lowercase) {
        seen.insert(c);
        *character_frequency_map.entry(c).or_insert(0) += 1;
    }

    let word_count = value.split(' ').count();
    let id = content_hash(value);

    Analysis {
        properties: StringProperties {
            length,
            is_palindrome,
            unique_characters: seen.len(),
            word_count,
            sha256_hash: id.clone(),
            character_frequency_map,
        },
        id,
    }
}
