//! Byte conversion for cached values.
//!
//! Cache backends store opaque bytes; values are encoded as JSON so cached
//! entries stay human-readable when inspecting a live cache. Note that
//! `Option::None` encodes as `null`, which is how cached absence is
//! distinguished from a missing key.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CacheError, Result};

/// Serializes a value to cache bytes.
pub fn to_cache_bytes<V: Serialize>(value: &V) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Deserializes cache bytes back into a value.
pub fn from_cache_bytes<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Row {
        name: String,
        surname: String,
    }

    fn row(name: &str, surname: &str) -> Row {
        Row {
            name: name.to_string(),
            surname: surname.to_string(),
        }
    }

    #[test]
    fn test_roundtrip_value() {
        let value = row("A", "t1");
        let bytes = to_cache_bytes(&value).expect("serialize should succeed");
        let back: Row = from_cache_bytes(&bytes).expect("deserialize should succeed");
        assert_eq!(value, back);
    }

    #[test]
    fn test_roundtrip_list() {
        let values = vec![row("A", "t1"), row("B", "t2")];
        let bytes = to_cache_bytes(&values).expect("serialize should succeed");
        let back: Vec<Row> = from_cache_bytes(&bytes).expect("deserialize should succeed");
        assert_eq!(values, back);
    }

    #[test]
    fn test_empty_list_is_cacheable() {
        let values: Vec<Row> = vec![];
        let bytes = to_cache_bytes(&values).expect("serialize should succeed");
        assert_eq!(bytes, b"[]");
        let back: Vec<Row> = from_cache_bytes(&bytes).expect("deserialize should succeed");
        assert!(back.is_empty());
    }

    #[test]
    fn test_absence_encodes_as_null() {
        let bytes = to_cache_bytes(&None::<Row>).expect("serialize should succeed");
        assert_eq!(bytes, b"null");
        let back: Option<Row> = from_cache_bytes(&bytes).expect("deserialize should succeed");
        assert!(back.is_none());
    }

    #[test]
    fn test_present_option_roundtrip() {
        let value = Some(row("A", "t1"));
        let bytes = to_cache_bytes(&value).expect("serialize should succeed");
        let back: Option<Row> = from_cache_bytes(&bytes).expect("deserialize should succeed");
        assert_eq!(value, back);
    }

    #[test]
    fn test_malformed_bytes() {
        let result: Result<Row> = from_cache_bytes(b"not valid json");
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }
}
