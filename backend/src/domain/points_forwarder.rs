//! Cache-aside forwarding of points payloads.
//!
//! This module provides the concrete implementation of [`PointsProcessing`]
//! that derives a content-addressed key, consults the cache, and only calls
//! the backend on a miss.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ports::{PointsBackend, PointsCache, PointsProcessing, ProcessingError};
use super::{PointsPayload, ResponseBody, fingerprint};

/// Concrete implementation of [`PointsProcessing`].
///
/// Per invocation:
/// 1. Fingerprint the payload.
/// 2. Read the cache once; a non-empty hit is returned without touching the
///    backend.
/// 3. On a miss, forward the payload to the backend exactly once.
/// 4. Cache successful bodies; translate failures without caching them.
///
/// The forwarder holds no locks. Concurrent identical requests may both miss
/// and both call the backend; the last cache write wins.
pub struct CacheAsideForwarder<C: ?Sized, B: ?Sized> {
    cache: Arc<C>,
    backend: Arc<B>,
}

impl<C, B> CacheAsideForwarder<C, B>
where
    C: PointsCache + ?Sized,
    B: PointsBackend + ?Sized,
{
    /// Create a forwarder over an externally owned cache and backend.
    pub fn new(cache: Arc<C>, backend: Arc<B>) -> Self {
        Self { cache, backend }
    }

    async fn cached(&self, key: &super::ports::PointsCacheKey) -> Option<ResponseBody> {
        match self.cache.get(key).await {
            Ok(Some(body)) if !body.is_empty() => Some(body),
            Ok(Some(_)) => {
                debug!(cache_key = %key, "ignoring empty cached points result");
                None
            }
            Ok(None) => None,
            Err(error) => {
                warn!(cache_key = %key, %error, "points cache read failed; treating as miss");
                None
            }
        }
    }
}

#[async_trait]
impl<C, B> PointsProcessing for CacheAsideForwarder<C, B>
where
    C: PointsCache + ?Sized,
    B: PointsBackend + ?Sized,
{
    async fn process_points(
        &self,
        payload: &PointsPayload,
    ) -> Result<ResponseBody, ProcessingError> {
        let key = fingerprint(payload);

        if let Some(body) = self.cached(&key).await {
            debug!(cache_key = %key, "points cache hit");
            return Ok(body);
        }
        debug!(cache_key = %key, points = payload.points().len(), "points cache miss");

        let body = self.backend.process(payload).await.map_err(|error| {
            warn!(
                cache_key = %key,
                status = error.status(),
                %error,
                "points backend call failed"
            );
            ProcessingError::from_backend(error)
        })?;

        if let Err(error) = self.cache.set(&key, &body).await {
            warn!(cache_key = %key, %error, "points cache write failed");
        }
        Ok(body)
    }
}

#[cfg(test)]
#[path = "points_forwarder_tests.rs"]
mod tests;
