//! Memory entry model

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `states` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredMemory {
    pub key: String,
    pub value: Vec<u8>,
    pub pkgname: String,
    pub userid: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A remembered value for one key, as seen by skills
///
/// An empty `value` means nothing usable was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub key: String,
    pub value: Vec<u8>,
}

impl MemoryEntry {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Entry carrying no value
    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Decode the stored JSON value; `Ok(None)` when nothing is stored
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        if self.value.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&self.value).map(Some)
    }
}

impl From<StoredMemory> for MemoryEntry {
    fn from(row: StoredMemory) -> Self {
        Self::new(row.key, row.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stored_value() {
        let entry = MemoryEntry::new("color", br#""blue""#.to_vec());
        assert_eq!(entry.decode::<String>().unwrap(), Some("blue".to_string()));
    }

    #[test]
    fn test_decode_empty_entry() {
        let entry = MemoryEntry::empty("color");
        assert!(entry.is_empty());
        assert_eq!(entry.decode::<String>().unwrap(), None);
    }

    #[test]
    fn test_decode_wrong_type_fails() {
        let entry = MemoryEntry::new("size", br#""XL""#.to_vec());
        assert!(entry.decode::<u32>().is_err());
    }
}
