//! Redis-backed points cache.
//!
//! Keys are namespaced `points:v1:<sha256>` so a change to the fingerprint
//! scheme can bump the version without flushing the store. Bodies are stored
//! as JSON text. When a TTL is configured, writes use `SET EX` with up to 10%
//! random jitter so entries written together do not expire together.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::domain::ResponseBody;
use crate::domain::ports::{PointsCache, PointsCacheError, PointsCacheKey};

/// Namespace prefix applied to every cache key.
pub const REDIS_KEY_PREFIX: &str = "points:v1:";

const JITTER_DIVISOR: u64 = 10;

/// [`PointsCache`] backed by a pooled Redis connection.
#[derive(Clone)]
pub struct RedisPointsCache {
    pool: Pool<RedisConnectionManager>,
    ttl: Option<Duration>,
}

impl RedisPointsCache {
    /// Wrap an existing connection pool.
    pub fn new(pool: Pool<RedisConnectionManager>, ttl: Option<Duration>) -> Self {
        Self { pool, ttl }
    }

    /// Build a pool for `url` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`PointsCacheError::Backend`] when the URL is invalid or the
    /// pool cannot establish its initial connection.
    pub async fn connect(url: &str, ttl: Option<Duration>) -> Result<Self, PointsCacheError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|error| PointsCacheError::backend(format!("invalid redis url: {error}")))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|error| PointsCacheError::backend(format!("redis pool: {error}")))?;
        Ok(Self::new(pool, ttl))
    }

    fn namespaced(key: &PointsCacheKey) -> String {
        format!("{REDIS_KEY_PREFIX}{key}")
    }
}

/// Expiry in whole seconds with up to 10% added jitter; never below one.
fn jittered_ttl_seconds(ttl: Duration, rng: &mut impl Rng) -> u64 {
    let base = ttl.as_secs().max(1);
    let spread = base / JITTER_DIVISOR;
    if spread == 0 {
        return base;
    }
    base.saturating_add(rng.gen_range(0..=spread))
}

#[async_trait]
impl PointsCache for RedisPointsCache {
    async fn get(&self, key: &PointsCacheKey) -> Result<Option<ResponseBody>, PointsCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| PointsCacheError::backend(error.to_string()))?;
        let raw: Option<String> = conn
            .get(Self::namespaced(key))
            .await
            .map_err(|error| PointsCacheError::backend(error.to_string()))?;

        raw.map(|text| serde_json::from_str::<Value>(&text).map(ResponseBody::new))
            .transpose()
            .map_err(|error| PointsCacheError::serialization(error.to_string()))
    }

    async fn set(&self, key: &PointsCacheKey, body: &ResponseBody) -> Result<(), PointsCacheError> {
        let text = serde_json::to_string(body.as_value())
            .map_err(|error| PointsCacheError::serialization(error.to_string()))?;
        let expiry = self
            .ttl
            .map(|ttl| jittered_ttl_seconds(ttl, &mut SmallRng::from_entropy()));

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| PointsCacheError::backend(error.to_string()))?;
        let name = Self::namespaced(key);
        let written = match expiry {
            Some(seconds) => conn.set_ex::<_, _, ()>(name, text, seconds).await,
            None => conn.set::<_, _, ()>(name, text).await,
        };
        written.map_err(|error| PointsCacheError::backend(error.to_string()))
    }
}
