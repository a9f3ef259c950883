//! Cached reader repository.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use cacheaside_core::cache::{cache_key, from_cache_bytes, ops, to_cache_bytes, Cache};
use cacheaside_core::store::{self, Entity, Predicate, Store};

use super::Result;

/// Read side of the cache-aside pattern.
///
/// Every operation derives a cache key from the entity's type tag, the
/// operation name and the predicate discriminator, returns the cached value
/// on a hit, and otherwise queries the store and populates the cache under
/// the configured TTL.
///
/// Once populated, a logical query keeps returning the cached value until
/// the TTL lapses or a [`CachedWriter`](super::CachedWriter) invalidates the
/// type's namespace, so a read is stale by at most
/// `min(ttl, time until next write)`.
///
/// Two callers racing on the same missed key may both query the store and
/// both populate; last write wins with equivalent fresh data.
pub struct CachedReader<T, S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    ttl: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S, C> CachedReader<T, S, C>
where
    T: Entity + Serialize + DeserializeOwned,
    S: Store<T>,
    C: Cache,
{
    /// Creates a reader over a store and a cache, caching results for `ttl`.
    pub fn new(store: Arc<S>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            store,
            cache,
            ttl,
            _entity: PhantomData,
        }
    }

    /// Returns all entities of type `T`.
    pub async fn get_all(&self) -> Result<Vec<T>> {
        let key = cache_key(T::TYPE_TAG, ops::GET_ALL, "");
        self.get_or_populate(&key, self.store.fetch_all()).await
    }

    /// Returns all entities matching the predicate.
    pub async fn get_all_matching(&self, predicate: &Predicate<T>) -> Result<Vec<T>> {
        let key = cache_key(T::TYPE_TAG, ops::GET_ALL, predicate.discriminator());
        self.get_or_populate(&key, self.store.fetch_matching(predicate))
            .await
    }

    /// Returns the first entity matching the predicate, or `None`.
    ///
    /// Absence is a first-class cached value: a `None` produced by the store
    /// is cached like any other result and served from the cache until
    /// invalidated or expired.
    pub async fn get_one(&self, predicate: &Predicate<T>) -> Result<Option<T>> {
        let key = cache_key(T::TYPE_TAG, ops::GET_ONE, predicate.discriminator());
        self.get_or_populate(&key, self.store.fetch_first(predicate))
            .await
    }

    /// Returns whether any entity matches the predicate.
    ///
    /// Implemented over [`get_all_matching`](Self::get_all_matching) so it
    /// shares that operation's cache entry instead of keeping a boolean one.
    pub async fn any(&self, predicate: &Predicate<T>) -> Result<bool> {
        Ok(!self.get_all_matching(predicate).await?.is_empty())
    }

    async fn get_or_populate<V, F>(&self, key: &str, fetch: F) -> Result<V>
    where
        V: Serialize + DeserializeOwned,
        F: Future<Output = store::Result<V>>,
    {
        if let Some(bytes) = self.cache.get(key).await? {
            match from_cache_bytes(&bytes) {
                Ok(value) => {
                    tracing::trace!(key, "cache hit");
                    return Ok(value);
                }
                Err(err) => {
                    // Corrupt entry: treat as a miss and let the fresh
                    // population overwrite it.
                    tracing::warn!(key, error = %err, "cached value failed to deserialize");
                }
            }
        }

        tracing::trace!(key, "cache miss");
        let value = fetch.await?;
        let bytes = to_cache_bytes(&value)?;
        self.cache.set(key, &bytes, Some(self.ttl)).await?;
        Ok(value)
    }
}
