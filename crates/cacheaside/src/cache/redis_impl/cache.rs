//! Redis cache implementation.
//!
//! Every written key is added to a Redis Set named after its type tag
//! (`"{tag}:_keys"`), so `delete_pattern` resolves a glob by filtering the
//! tracked members instead of scanning the keyspace.
//!
//! The tracking operations are not atomic with the writes they mirror, which
//! is safe here: a stale tracking member makes `delete_pattern` issue a DEL
//! for a key that no longer exists (a no-op), and an orphaned key missed by
//! tracking still expires through its TTL. The worst case is temporary
//! inconsistency, never a wrongly-surviving cache entry being resurrected.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;

use cacheaside_core::cache::{
    pattern_matches, tracking_key, type_tag_of_key, type_tag_of_pattern, Cache, CacheError, Result,
};

use super::RedisConfig;

fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}

/// Redis cache backend using a managed connection.
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be
    /// established within the configured timeout.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str()).map_err(map_redis_error)?;
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(config.connect_timeout_secs));
        let conn = ConnectionManager::new_with_config(client, manager_config)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();

        match ttl {
            Some(duration) => {
                let seconds = duration.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, seconds)
                    .await
                    .map_err(map_redis_error)?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(map_redis_error)?;
            }
        }

        if let Some(tag) = type_tag_of_key(key) {
            conn.sadd::<_, _, ()>(&tracking_key(tag), key)
                .await
                .map_err(map_redis_error)?;
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();

        if let Some(tag) = type_tag_of_key(key) {
            conn.srem::<_, _, ()>(&tracking_key(tag), key)
                .await
                .map_err(map_redis_error)?;
        }

        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;

        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        // Patterns without a literal tag segment have no tracking set; we
        // only ever track keys under a concrete tag.
        let Some(tag) = type_tag_of_pattern(pattern) else {
            return Ok(());
        };

        let mut conn = self.conn.clone();
        let tracking = tracking_key(tag);

        let tracked_keys: Vec<String> = conn.smembers(&tracking).await.map_err(map_redis_error)?;

        let matching: Vec<&String> = tracked_keys
            .iter()
            .filter(|k| pattern_matches(pattern, k))
            .collect();

        if !matching.is_empty() {
            conn.del::<_, ()>(&matching).await.map_err(map_redis_error)?;
            conn.srem::<_, _, ()>(&tracking, &matching)
                .await
                .map_err(map_redis_error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_cache() -> Option<RedisCache> {
        RedisCache::connect(&RedisConfig::new(redis_url(), 5)).await.ok()
    }

    /// Generate a unique type tag so concurrent test runs cannot collide.
    fn test_tag() -> String {
        format!("test-{}", Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_redis_set_and_get() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let tag = test_tag();
        let key = format!("{tag}:get_all:");

        cache.set(&key, b"[]", None).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"[]".to_vec()));

        cache.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_get_nonexistent() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:get_all:", test_tag());
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_delete() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:get_all:", test_tag());
        cache.set(&key, b"[]", None).await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        cache.delete(&key).await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_ttl() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:get_all:", test_tag());
        cache
            .set(&key, b"[]", Some(Duration::from_secs(1)))
            .await
            .unwrap();

        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_delete_pattern_wipes_tag_namespace() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let tag = test_tag();
        let other_tag = test_tag();
        let key1 = format!("{tag}:get_all:");
        let key2 = format!("{tag}:get_one:surname=t1");
        let key3 = format!("{other_tag}:get_all:");

        cache.set(&key1, b"1", None).await.unwrap();
        cache.set(&key2, b"2", None).await.unwrap();
        cache.set(&key3, b"3", None).await.unwrap();

        cache.delete_pattern(&format!("{tag}:*")).await.unwrap();

        assert!(cache.get(&key1).await.unwrap().is_none());
        assert!(cache.get(&key2).await.unwrap().is_none());
        assert!(cache.get(&key3).await.unwrap().is_some());

        cache.delete(&key3).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_delete_pattern_without_tag_is_noop() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:get_all:", test_tag());
        cache.set(&key, b"[]", None).await.unwrap();

        cache.delete_pattern("*").await.unwrap();

        assert!(cache.get(&key).await.unwrap().is_some());

        cache.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_delete_removes_tracking() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let tag = test_tag();
        let key = format!("{tag}:get_all:");
        let tracking = tracking_key(&tag);

        cache.set(&key, b"[]", None).await.unwrap();

        let mut conn = cache.conn.clone();
        let tracked: Vec<String> = conn.smembers(&tracking).await.unwrap();
        assert!(tracked.contains(&key));

        cache.delete(&key).await.unwrap();

        let tracked_after: Vec<String> = conn.smembers(&tracking).await.unwrap();
        assert!(!tracked_after.contains(&key));

        conn.del::<_, ()>(&tracking).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_overwrite() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:get_all:", test_tag());

        cache.set(&key, b"first", None).await.unwrap();
        cache.set(&key, b"second", None).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"second".to_vec()));

        cache.delete(&key).await.unwrap();
    }
}
