//! Item identifiers
//!
//! ID Format:
//! - Provisional (draft) IDs: `d-{7-char-hash}` (e.g., `d-7f2b4c1`)
//! - Server-assigned IDs: opaque non-empty strings, round-tripped verbatim
//!
//! Provisional IDs are assigned locally when an item is staged for creation
//! and replaced by the server-assigned ID once the creation commits. The hash
//! is derived from a per-state sequence number and the creation timestamp, so
//! two drafts created in the same instant still get distinct IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Item ID must not be empty")]
    Empty,
}

/// Generates a 7-character hash from a sequence number and timestamp
fn generate_hash(sequence: u64, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}:{}", sequence, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Identifier of a domain item
///
/// An ID is unique across the union of the persisted and draft lists of one
/// state. The placeholder ID (empty string) marks an item that has not been
/// dispatched yet; the CRUD behavior replaces it with a provisional ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Creates a provisional draft ID in the format `d-{7-char-hash}`
    pub fn provisional(sequence: u64, timestamp: DateTime<Utc>) -> Self {
        Self(format!("d-{}", generate_hash(sequence, timestamp)))
    }

    /// The placeholder ID carried by items that were never dispatched
    pub fn placeholder() -> Self {
        Self(String::new())
    }

    /// Returns true if this is the placeholder ID
    pub fn is_placeholder(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if this ID was assigned locally and is not yet
    /// confirmed by the remote source
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with("d-")
    }

    /// The raw string form of the ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ItemId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_ids_have_draft_prefix() {
        let id = ItemId::provisional(0, Utc::now());
        assert!(id.is_provisional());
        assert!(!id.is_placeholder());
        assert_eq!(id.as_str().len(), 9);
    }

    #[test]
    fn distinct_sequences_give_distinct_ids() {
        let now = Utc::now();
        let a = ItemId::provisional(1, now);
        let b = ItemId::provisional(2, now);
        assert_ne!(a, b);
    }

    #[test]
    fn placeholder_is_not_provisional() {
        let id = ItemId::placeholder();
        assert!(id.is_placeholder());
        assert!(!id.is_provisional());
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!("  ".parse::<ItemId>(), Err(IdError::Empty));
    }

    #[test]
    fn server_ids_round_trip() {
        let id: ItemId = "sel-42".parse().unwrap();
        assert_eq!(id.to_string(), "sel-42");
        assert!(!id.is_provisional());
    }
}
