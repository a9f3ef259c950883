//! Pure cache-key derivation.
//!
//! A cache key is composed from an entity type tag, an operation name and a
//! discriminator: `"{tag}:{op}:{discriminator}"`. Keeping derivation a pure
//! function of those three inputs means two logically-equivalent queries land
//! on the same key and a write can wipe a whole type namespace with one glob.

/// Operation names used as the middle segment of cache keys.
pub mod ops {
    pub const GET_ALL: &str = "get_all";
    pub const GET_ONE: &str = "get_one";
}

/// Returns the cache key for an operation on an entity type.
///
/// The discriminator is empty for unscoped operations, producing keys such
/// as `"person:get_all:"`.
pub fn cache_key(type_tag: &str, operation: &str, discriminator: &str) -> String {
    format!("{type_tag}:{operation}:{discriminator}")
}

/// Returns the glob pattern matching every cache key of an entity type.
pub fn invalidation_pattern(type_tag: &str) -> String {
    format!("{type_tag}:*")
}

/// Returns the Redis Set key tracking cache keys of an entity type.
///
/// Backends that cannot enumerate keys cheaply record each written key in
/// this set so pattern deletion never needs a full keyspace scan.
pub fn tracking_key(type_tag: &str) -> String {
    format!("{type_tag}:_keys")
}

/// Extracts the type tag from a cache key, if present.
pub fn type_tag_of_key(key: &str) -> Option<&str> {
    let (tag, _) = key.split_once(':')?;
    if tag.is_empty() {
        return None;
    }
    Some(tag)
}

/// Extracts the type tag from a glob pattern, if present.
///
/// Returns `None` when the tag position itself contains a wildcard, since no
/// single tag can be extracted from it.
pub fn type_tag_of_pattern(pattern: &str) -> Option<&str> {
    let tag = type_tag_of_key(pattern)?;
    if tag.contains('*') {
        return None;
    }
    Some(tag)
}
