//! Cache-aside data-access layer.
//!
//! Reads go through [`CachedReader`]: served from the cache when possible,
//! populated from the authoritative store on miss. Writes go through
//! [`CachedWriter`]: applied to the store, then the entity type's cache
//! namespace is invalidated, either immediately or at commit time when the
//! write happens inside a [`Transaction`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use cacheaside::cache::MemoryCache;
//! use cacheaside::store::MemoryStore;
//! use cacheaside::{CachedReader, CachedWriter};
//! use cacheaside_core::store::Predicate;
//!
//! let store = Arc::new(MemoryStore::<Person>::new());
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let reader = CachedReader::new(store.clone(), cache.clone(), Duration::from_secs(300));
//! let writer = CachedWriter::new(store, cache);
//!
//! let by_surname = Predicate::new("surname=t1", |p: &Person| p.surname == "t1");
//! let people = reader.get_all_matching(&by_surname).await?;
//!
//! let mut txn = writer.begin_transaction(None).await?;
//! writer.remove(&people[0]).await?; // invalidation deferred
//! txn.commit().await?;              // store committed, cache invalidated
//! ```

pub mod cache;
pub mod config;
pub mod repository;
pub mod store;

pub use repository::{CachedReader, CachedWriter, RepositoryError, Transaction};
