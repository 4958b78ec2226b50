//! Cache adapters implementing the `PointsCache` port.
//!
//! - [`MemoryPointsCache`]: in-process `moka` store with a TTL and an
//!   optional capacity bound. The default for single-instance deployments.
//! - [`RedisPointsCache`]: shared store for multi-instance deployments, pooled
//!   through `bb8-redis`, with namespaced keys and jittered expiry.
//!
//! Both adapters treat expired entries as absent and store bodies as JSON.

mod memory;
mod redis;

use std::num::NonZeroUsize;
use std::time::Duration;

pub use memory::MemoryPointsCache;
pub use redis::{REDIS_KEY_PREFIX, RedisPointsCache};

/// Default lifetime of a cached result.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// Longest lifetime a cached result may be given.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Expiry and capacity settings shared by the cache adapters.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use point_relay::outbound::cache::CachePolicy;
///
/// let policy = CachePolicy::default();
/// assert_eq!(policy.ttl(), Some(Duration::from_secs(5)));
/// assert_eq!(CachePolicy::new(Duration::ZERO, None).ttl(), None);
/// assert_eq!(
///     CachePolicy::new(Duration::MAX, None).ttl(),
///     Some(point_relay::outbound::cache::MAX_CACHE_TTL)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    ttl: Option<Duration>,
    max_entries: Option<NonZeroUsize>,
}

impl CachePolicy {
    /// Build a policy; a zero TTL disables expiry and longer TTLs are capped
    /// at [`MAX_CACHE_TTL`].
    pub fn new(ttl: Duration, max_entries: Option<NonZeroUsize>) -> Self {
        Self {
            ttl: (!ttl.is_zero()).then_some(ttl.min(MAX_CACHE_TTL)),
            max_entries,
        }
    }

    /// Entry lifetime, or `None` when entries never expire.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Maximum number of entries kept in process, if bounded.
    pub fn max_entries(&self) -> Option<NonZeroUsize> {
        self.max_entries
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL, None)
    }
}
