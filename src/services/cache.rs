use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::services::collaborators::{ProjectionError, UserListProjection};

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

impl From<CacheError> for ProjectionError {
    fn from(e: CacheError) -> Self {
        ProjectionError::Unavailable(e.to_string())
    }
}

/// Multi-tier cache manager
///
/// L1 (moka, in-process) and L2 (Redis, shared) hold short-lived values such
/// as display names. Redis also holds the per-user list projection as sets,
/// which are never mirrored in L1.
pub struct CacheManager {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1_cache,
            ttl_secs,
        })
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        if let Some(json) = value {
            tracing::trace!("L2 cache hit: {}", key);
            self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;
            return Ok(serde_json::from_str(&json)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both L1 and L2)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both cache tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;
        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        Ok(())
    }

    /// Add `member` to the Redis set at `key`. Returns true if it was new.
    pub async fn add_to_set(&self, key: &str, member: &str) -> Result<bool, CacheError> {
        let mut conn = self.redis.lock().await;
        let added: i64 = redis::cmd("SADD")
            .arg(key)
            .arg(member)
            .query_async(&mut *conn)
            .await?;
        Ok(added > 0)
    }

    /// All members of the Redis set at `key`, sorted
    pub async fn set_members(&self, key: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.redis.lock().await;
        let mut members: Vec<String> = redis::cmd("SMEMBERS")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        members.sort();
        Ok(members)
    }

    /// Ping Redis
    pub async fn health_check(&self) -> bool {
        let mut conn = self.redis.lock().await;
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut *conn).await;
        pong.is_ok()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

#[async_trait]
impl UserListProjection for CacheManager {
    async fn add_swiped_target(&self, user_id: &str, target_id: &str) -> Result<(), ProjectionError> {
        self.add_to_set(&CacheKey::swiped_targets(user_id), target_id).await?;
        Ok(())
    }

    async fn add_matched_peer(&self, user_id: &str, peer_id: &str) -> Result<(), ProjectionError> {
        if self.add_to_set(&CacheKey::matched_peers(user_id), peer_id).await? {
            tracing::debug!("Added {} to matched peers of {}", peer_id, user_id);
        }
        Ok(())
    }

    async fn swiped_targets(&self, user_id: &str) -> Result<Vec<String>, ProjectionError> {
        Ok(self.set_members(&CacheKey::swiped_targets(user_id)).await?)
    }

    async fn matched_peers(&self, user_id: &str) -> Result<Vec<String>, ProjectionError> {
        Ok(self.set_members(&CacheKey::matched_peers(user_id)).await?)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a user's display name
    pub fn display_name(user_id: &str) -> String {
        format!("name:{}", user_id)
    }

    /// Build the Redis set key for users `user_id` has swiped on
    pub fn swiped_targets(user_id: &str) -> String {
        format!("swiped:{}", user_id)
    }

    /// Build the Redis set key for users `user_id` has matched with
    pub fn matched_peers(user_id: &str) -> String {
        format!("matched:{}", user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_set_get() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = CacheKey::display_name("cache-test-user");
        cache.set(&key, &"Jordan").await.unwrap();
        let result: String = cache.get(&key).await.unwrap();
        assert_eq!(result, "Jordan");

        cache.delete(&key).await.unwrap();
        assert!(cache.get::<String>(&key).await.is_err());
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_matched_peers_are_a_set() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");
        let user = format!("cache-test-{}", uuid::Uuid::new_v4());

        cache.add_matched_peer(&user, "b").await.unwrap();
        cache.add_matched_peer(&user, "a").await.unwrap();
        cache.add_matched_peer(&user, "b").await.unwrap();

        assert_eq!(cache.matched_peers(&user).await.unwrap(), vec!["a", "b"]);
        cache.delete(&CacheKey::matched_peers(&user)).await.unwrap();
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::display_name("user123"), "name:user123");
        assert_eq!(CacheKey::swiped_targets("user123"), "swiped:user123");
        assert_eq!(CacheKey::matched_peers("user123"), "matched:user123");
    }
}
