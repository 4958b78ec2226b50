//! In-process points cache backed by `moka`.

use async_trait::async_trait;
use moka::future::Cache;

use super::CachePolicy;
use crate::domain::ResponseBody;
use crate::domain::ports::{PointsCache, PointsCacheError, PointsCacheKey};

/// In-memory [`PointsCache`] keyed by payload fingerprint.
///
/// Entries expire `ttl` after they were last written. With a capacity bound
/// the store evicts using moka's TinyLFU policy; expired entries are never
/// returned even before the background sweep removes them.
#[derive(Clone)]
pub struct MemoryPointsCache {
    inner: Cache<PointsCacheKey, ResponseBody>,
}

impl MemoryPointsCache {
    /// Create an empty cache with the given policy.
    pub fn new(policy: CachePolicy) -> Self {
        let mut builder = Cache::builder();
        if let Some(limit) = policy.max_entries() {
            builder = builder.max_capacity(u64::try_from(limit.get()).unwrap_or(u64::MAX));
        }
        if let Some(ttl) = policy.ttl() {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner: builder.name("points").build(),
        }
    }

    /// Approximate number of live entries.
    ///
    /// Pending evictions are only reflected after moka's maintenance runs.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MemoryPointsCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

#[async_trait]
impl PointsCache for MemoryPointsCache {
    async fn get(&self, key: &PointsCacheKey) -> Result<Option<ResponseBody>, PointsCacheError> {
        Ok(self.inner.get(key).await)
    }

    async fn set(&self, key: &PointsCacheKey, body: &ResponseBody) -> Result<(), PointsCacheError> {
        self.inner.insert(key.clone(), body.clone()).await;
        Ok(())
    }
}
