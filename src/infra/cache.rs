//! Redis cache implementation.
//!
//! `KeyValueCache` is the seam services depend on; `Cache` is the Redis
//! implementation backed by a `ConnectionManager`. Typed JSON helpers and
//! the distributed lock guard are written against the trait.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::config::{Config, CACHE_PREFIX_LOCK};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Minimal key/value contract used by the service layer.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Get a raw string value.
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>>;

    /// Store a raw string value with a TTL in seconds.
    async fn set_raw(&self, key: &str, value: String, ttl_seconds: u64) -> AppResult<()>;

    /// Delete a key.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Round-trip to the server.
    async fn ping(&self) -> AppResult<()>;

    /// Take `lock:{resource}` if free. Returns the owner token on success.
    async fn try_lock(&self, resource: &str, ttl_seconds: u64) -> AppResult<Option<String>>;

    /// Release `lock:{resource}` only if still owned by `token`.
    async fn unlock(&self, resource: &str, token: &str) -> AppResult<bool>;
}

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }
}

#[async_trait]
impl KeyValueCache for Cache {
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: String, ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await.map_err(cache_error)?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    async fn try_lock(&self, resource: &str, ttl_seconds: u64) -> AppResult<Option<String>> {
        let key = format!("{}{}", CACHE_PREFIX_LOCK, resource);
        let token = Uuid::new_v4().to_string();
        let mut conn = self.connection.clone();

        // SET NX EX answers OK when taken, nil when already held
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&token)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        Ok(reply.map(|_| token))
    }

    async fn unlock(&self, resource: &str, token: &str) -> AppResult<bool> {
        let key = format!("{}{}", CACHE_PREFIX_LOCK, resource);
        let mut conn = self.connection.clone();

        let script = r#"
            if redis.call("GET", KEYS[1]) == ARGV[1] then
                return redis.call("DEL", KEYS[1])
            else
                return 0
            end
        "#;

        let released: i32 = redis::cmd("EVAL")
            .arg(script)
            .arg(1)
            .arg(&key)
            .arg(token)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        Ok(released == 1)
    }
}

// =============================================================================
// Typed helpers
// =============================================================================

/// Read and deserialize a JSON value.
pub async fn get_json<T: DeserializeOwned>(
    cache: &dyn KeyValueCache,
    key: &str,
) -> AppResult<Option<T>> {
    match cache.get_raw(key).await? {
        Some(json) => {
            let parsed = serde_json::from_str(&json).map_err(|e| {
                AppError::internal(format!("Cache deserialization error: {}", e))
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Serialize and store a JSON value.
pub async fn set_json<T: Serialize>(
    cache: &dyn KeyValueCache,
    key: &str,
    value: &T,
    ttl_seconds: u64,
) -> AppResult<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;
    cache.set_raw(key, json, ttl_seconds).await
}

// =============================================================================
// Lock Guard (RAII)
// =============================================================================

/// Why a lock could not be taken.
#[derive(Error, Debug)]
pub enum LockError {
    /// Another owner still held the lock after every retry
    #[error("Lock '{0}' is held by another owner")]
    Held(String),

    /// The cache itself failed
    #[error(transparent)]
    Cache(#[from] AppError),
}

impl From<LockError> for AppError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Held(resource) => {
                AppError::conflict(format!("Resource '{}' is busy, retry shortly", resource))
            }
            LockError::Cache(e) => e,
        }
    }
}

/// Acquire a distributed lock, retrying while it is held elsewhere.
pub async fn acquire_lock(
    cache: Arc<dyn KeyValueCache>,
    resource: &str,
    ttl_seconds: u64,
    max_retries: u32,
    retry_delay_ms: u64,
) -> Result<LockGuard, LockError> {
    for attempt in 0..=max_retries {
        if let Some(token) = cache.try_lock(resource, ttl_seconds).await? {
            tracing::debug!(resource = %resource, "Lock acquired");
            return Ok(LockGuard {
                cache,
                resource: resource.to_string(),
                token,
                released: false,
            });
        }

        if attempt < max_retries {
            sleep(Duration::from_millis(retry_delay_ms)).await;
        }
    }

    tracing::warn!(resource = %resource, "Failed to acquire lock after retries");
    Err(LockError::Held(resource.to_string()))
}

/// RAII guard for distributed locks.
/// Automatically releases the lock when dropped.
pub struct LockGuard {
    cache: Arc<dyn KeyValueCache>,
    resource: String,
    token: String,
    released: bool,
}

impl LockGuard {
    /// Release the lock now instead of on drop.
    pub async fn release(mut self) -> AppResult<()> {
        self.released = true;
        if self.cache.unlock(&self.resource, &self.token).await? {
            tracing::debug!(resource = %self.resource, "Lock released");
        }
        Ok(())
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let cache = self.cache.clone();
        let resource = std::mem::take(&mut self.resource);
        let token = std::mem::take(&mut self.token);

        // Drop may run outside a runtime (e.g. in sync tests); the TTL covers that case.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = cache.unlock(&resource, &token).await {
                    tracing::error!(resource = %resource, error = %e, "Failed to release lock on drop");
                } else {
                    tracing::debug!(resource = %resource, "Lock released on drop");
                }
            });
        }
    }
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: i32,
        name: String,
    }

    #[tokio::test]
    async fn test_get_json_decodes_hit() {
        let mut cache = MockKeyValueCache::new();
        cache
            .expect_get_raw()
            .with(eq("sample:1"))
            .returning(|_| Ok(Some(r#"{"id":1,"name":"one"}"#.to_string())));

        let value: Option<Sample> = get_json(&cache, "sample:1").await.unwrap();
        assert_eq!(
            value,
            Some(Sample {
                id: 1,
                name: "one".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_get_json_rejects_garbage() {
        let mut cache = MockKeyValueCache::new();
        cache
            .expect_get_raw()
            .returning(|_| Ok(Some("not json".to_string())));

        let result: AppResult<Option<Sample>> = get_json(&cache, "sample:1").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_set_json_serializes() {
        let mut cache = MockKeyValueCache::new();
        cache
            .expect_set_raw()
            .withf(|key, value, ttl| key == "sample:2" && value.contains("\"two\"") && *ttl == 60)
            .returning(|_, _, _| Ok(()));

        let sample = Sample {
            id: 2,
            name: "two".to_string(),
        };
        set_json(&cache, "sample:2", &sample, 60).await.unwrap();
    }

    #[tokio::test]
    async fn test_acquire_lock_retries_then_releases() {
        let mut cache = MockKeyValueCache::new();
        let mut seq = mockall::Sequence::new();
        cache
            .expect_try_lock()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        cache
            .expect_try_lock()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Some("token".to_string())));
        cache
            .expect_unlock()
            .with(eq("seed"), eq("token"))
            .times(1)
            .returning(|_, _| Ok(true));

        let guard = acquire_lock(Arc::new(cache), "seed", 5, 3, 1).await.unwrap();
        guard.release().await.unwrap();
    }

    #[tokio::test]
    async fn test_acquire_lock_gives_up() {
        let mut cache = MockKeyValueCache::new();
        cache.expect_try_lock().times(3).returning(|_, _| Ok(None));

        let result = acquire_lock(Arc::new(cache), "seed", 5, 2, 1).await;
        assert!(matches!(result, Err(LockError::Held(ref r)) if r == "seed"));
    }

    #[tokio::test]
    async fn test_acquire_lock_reports_cache_failure() {
        let mut cache = MockKeyValueCache::new();
        cache
            .expect_try_lock()
            .times(1)
            .returning(|_, _| Err(AppError::internal("connection refused")));

        let result = acquire_lock(Arc::new(cache), "seed", 5, 2, 1).await;
        assert!(matches!(result, Err(LockError::Cache(AppError::Internal(_)))));
    }

    #[test]
    fn test_held_lock_maps_to_conflict() {
        let err = AppError::from(LockError::Held("seed".to_string()));
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
