//! Cache-aside repositories.
//!
//! [`CachedReader`] serves reads through the cache with get-or-populate
//! memoization; [`CachedWriter`] applies writes to the store and invalidates
//! the entity type's cache namespace, deferring the invalidation to commit
//! when a [`Transaction`] is open. Both compose a store handle and a cache
//! handle injected at construction; neither owns any policy of the
//! collaborators beyond the key namespace they agree on.

mod reader;
mod transaction;
mod writer;

pub use reader::CachedReader;
pub use transaction::Transaction;
pub use writer::CachedWriter;

use cacheaside_core::cache::CacheError;
use cacheaside_core::store::StoreError;
use thiserror::Error;

/// Errors surfaced by repository operations.
///
/// Collaborator failures pass through unchanged; the repositories add no
/// failure kinds of their own. "No matching entity" is `None`, not an error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_passes_through_unchanged() {
        let inner = StoreError::QueryFailed("boom".to_string());
        let outer = RepositoryError::from(inner.clone());
        assert_eq!(outer.to_string(), inner.to_string());
    }

    #[test]
    fn test_cache_error_passes_through_unchanged() {
        let inner = CacheError::ConnectionFailed("refused".to_string());
        let outer = RepositoryError::from(inner.clone());
        assert_eq!(outer.to_string(), inner.to_string());
    }
}
