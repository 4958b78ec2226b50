//! Builders wiring configured adapters into the points processing port.

use std::sync::Arc;

use point_relay::domain::CacheAsideForwarder;
use point_relay::domain::ports::{PointsBackend, PointsCache, PointsProcessing};
use point_relay::outbound::cache::{MemoryPointsCache, RedisPointsCache};
use point_relay::outbound::points_backend::HttpPointsBackend;
use point_relay::settings::{CacheBackend, RelaySettings};
use tracing::info;

/// Build the cache store selected by configuration.
///
/// # Errors
/// Returns [`std::io::Error`] when the Redis pool cannot be created.
async fn build_cache(settings: &RelaySettings) -> std::io::Result<Arc<dyn PointsCache>> {
    let policy = settings.cache_policy();
    match settings.cache_backend() {
        CacheBackend::Memory => {
            info!(
                ttl_secs = policy.ttl().map(|ttl| ttl.as_secs()),
                max_entries = policy.max_entries().map(|max| max.get()),
                "using in-memory points cache"
            );
            Ok(Arc::new(MemoryPointsCache::new(policy)))
        }
        CacheBackend::Redis { url } => {
            let cache = RedisPointsCache::connect(url, policy.ttl())
                .await
                .map_err(|e| std::io::Error::other(format!("redis cache: {e}")))?;
            info!(
                ttl_secs = policy.ttl().map(|ttl| ttl.as_secs()),
                "using redis points cache"
            );
            Ok(Arc::new(cache))
        }
    }
}

/// Build the reqwest backend adapter.
///
/// # Errors
/// Returns [`std::io::Error`] when the HTTP client cannot be constructed.
fn build_backend(settings: &RelaySettings) -> std::io::Result<Arc<dyn PointsBackend>> {
    let backend = HttpPointsBackend::new(
        settings.backend_endpoint().clone(),
        settings.backend_timeout(),
    )
    .map_err(|e| std::io::Error::other(format!("backend client: {e}")))?;
    info!(
        endpoint = %backend.endpoint(),
        timeout_ms = u64::try_from(settings.backend_timeout().as_millis()).unwrap_or(u64::MAX),
        "points backend configured"
    );
    Ok(Arc::new(backend))
}

/// Compose the cache-aside forwarder from configured adapters.
///
/// # Errors
/// Propagates adapter construction failures.
pub(crate) async fn build_points_processing(
    settings: &RelaySettings,
) -> std::io::Result<Arc<dyn PointsProcessing>> {
    let cache = build_cache(settings).await?;
    let backend = build_backend(settings)?;
    Ok(Arc::new(CacheAsideForwarder::new(cache, backend)))
}
