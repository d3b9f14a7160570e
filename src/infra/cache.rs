//! Redis-backed request counters for rate limiting.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::config::CACHE_PREFIX_RATE_LIMIT;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fixed-window request counter.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request against `key`.
    /// Returns (current_count, is_allowed).
    async fn hit(&self, key: &str, max_requests: u64, window_seconds: u64) -> AppResult<(u64, bool)>;

    /// Check backend connectivity.
    async fn ping(&self) -> AppResult<()>;
}

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis, returning an error instead of panicking.
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis connected for rate limiting");
        Ok(Self { connection })
    }
}

#[async_trait]
impl RateLimiter for Cache {
    async fn hit(&self, key: &str, max_requests: u64, window_seconds: u64) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, key);
        let mut conn = self.connection.clone();

        // INCR creates the key at 1; the first hit opens the window.
        let count: u64 = conn.incr(&key, 1u64).await.map_err(cache_error)?;
        if count == 1 {
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        Ok((count, count <= max_requests))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: bool = conn.exists("health:ping").await.map_err(cache_error)?;
        Ok(())
    }
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    AppError::internal(format!("Cache error: {}", e))
}
