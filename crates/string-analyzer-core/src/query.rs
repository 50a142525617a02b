//! Query interpretation.
//!
//! Two entry points produce the same [`StringFilter`]:
//!
//! - **Structured**: the typed query parameters of `GET /strings`, deserialized
//!   straight into a [`StringFilter`] and checked with [`StringFilter::validate`].
//! - **Natural language**: [`NaturalLanguageQuery::parse`] matches the input
//!   exactly against a closed table of four phrases. Anything else,
//!   including a missing query, means "no filter".
//!
//! Every present field of a filter is a conjunctive clause.

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::models::StringRecord;

/// Parse a boolean-like word, ignoring case and surrounding whitespace.
///
/// `true/t/yes/y/on/1` and `false/f/no/n/off/0`; anything else is `None`.
pub fn parse_bool_word(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

struct BoolWordVisitor;

impl<'de> Visitor<'de> for BoolWordVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean such as true, false, 1, 0, yes, no, on, off")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        parse_bool_word(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}

struct OptionalBoolWordVisitor;

impl<'de> Visitor<'de> for OptionalBoolWordVisitor {
    type Value = Option<bool>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an optional boolean")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(BoolWordVisitor).map(Some)
    }
}

/// Accepts JSON booleans and the words of [`parse_bool_word`], so query
/// strings like `?is_palindrome=1` or `?is_palindrome=False` work.
fn deserialize_bool_word<'de, D>(d: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_option(OptionalBoolWordVisitor)
}

/// Conjunctive predicate over stored records.
///
/// Serializes with every field present (`null` when unset), which is the
/// `filters_applied` echo of the structured endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringFilter {
    #[serde(default, deserialize_with = "deserialize_bool_word")]
    pub is_palindrome: Option<bool>,
    /// Inclusive lower bound on `length`.
    pub min_length: Option<usize>,
    /// Inclusive upper bound on `length`.
    pub max_length: Option<usize>,
    pub word_count: Option<usize>,
    /// Matched against the stored value, not the frequency map.
    pub contains_character: Option<char>,
}

impl StringFilter {
    /// Reject parameter values outside their allowed range.
    ///
    /// An inverted `min_length`/`max_length` pair is allowed and simply
    /// matches nothing.
    pub fn validate(&self) -> Result<(), String> {
        if self.word_count == Some(0) {
            return Err("word_count must be >= 1".to_string());
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &StringRecord) -> bool {
        let props = &record.properties;

        if let Some(p) = self.is_palindrome {
            if props.is_palindrome != p {
                return false;
            }
        }
        if let Some(min) = self.min_length {
            if props.length < min {
                return false;
            }
        }
        if let Some(max) = self.max_length {
            if props.length > max {
                return false;
            }
        }
        if let Some(wc) = self.word_count {
            if props.word_count != wc {
                return false;
            }
        }
        if let Some(c) = self.contains_character {
            if !record.value.contains(c) {
                return false;
            }
        }
        true
    }

    /// Keep only the records this filter accepts, preserving order.
    pub fn apply(&self, records: Vec<StringRecord>) -> Vec<StringRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// The recognized natural-language phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalLanguageQuery {
    SingleWordPalindromes,
    LongerThanTenCharacters,
    PalindromesWithFirstVowel,
    ContainingLetterZ,
}

impl NaturalLanguageQuery {
    pub const ALL: [Self; 4] = [
        Self::SingleWordPalindromes,
        Self::LongerThanTenCharacters,
        Self::PalindromesWithFirstVowel,
        Self::ContainingLetterZ,
    ];

    pub fn phrase(self) -> &'static str {
        match self {
            Self::SingleWordPalindromes => "all single word palindromic strings",
            Self::LongerThanTenCharacters => "strings longer than 10 characters",
            Self::PalindromesWithFirstVowel => "palindromic strings that contain the first vowel",
            Self::ContainingLetterZ => "strings containing the letter z",
        }
    }

    /// Exact, case-sensitive match against the phrase table.
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.phrase() == text)
    }

    pub fn filter(self) -> StringFilter {
        match self {
            Self::SingleWordPalindromes => StringFilter {
                is_palindrome: Some(true),
                word_count: Some(1),
                ..Default::default()
            },
            // length > 10
            Self::LongerThanTenCharacters => StringFilter {
                min_length: Some(11),
                ..Default::default()
            },
            Self::PalindromesWithFirstVowel => StringFilter {
                is_palindrome: Some(true),
                contains_character: Some('a'),
                ..Default::default()
            },
            Self::ContainingLetterZ => StringFilter {
                contains_character: Some('z'),
                ..Default::default()
            },
        }
    }
}

/// Compact echo of a filter: only the keys that constrain anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_palindrome: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains_character: Option<char>,
}

impl From<&StringFilter> for ParsedFilters {
    fn from(f: &StringFilter) -> Self {
        Self {
            word_count: f.word_count,
            is_palindrome: f.is_palindrome,
            min_length: f.min_length,
            max_length: f.max_length,
            contains_character: f.contains_character,
        }
    }
}

/// How a free-text query was understood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpretedQuery {
    pub original: Option<String>,
    pub parsed_filters: ParsedFilters,
}

/// Translate an optional free-text query into a filter plus its echo.
///
/// Unrecognized or missing text yields the empty filter, which matches
/// every record.
pub fn interpret(query: Option<&str>) -> (StringFilter, InterpretedQuery) {
    let filter = query
        .and_then(NaturalLanguageQuery::parse)
        .map(NaturalLanguageQuery::filter)
        .unwrap_or_default();
    let interpreted = InterpretedQuery {
        original: query.map(str::to_string),
        parsed_filters: ParsedFilters::from(&filter),
    };
    (filter, interpreted)
}
