//! Driven port for the key/value store holding processed points results.
//!
//! The store owns expiry and eviction. The forwarder only ever performs a
//! single `get` and at most one `set` per request, so adapters need no
//! multi-key transactions.
use async_trait::async_trait;

use super::{PointsCacheKey, define_port_error};
use crate::domain::ResponseBody;

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum PointsCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "points cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "points cache serialisation failed: {message}",
    }
}

/// Port for reading and writing cached backend responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointsCache: Send + Sync {
    /// Read the cached body for the given key, returning `None` when absent
    /// or expired.
    async fn get(&self, key: &PointsCacheKey) -> Result<Option<ResponseBody>, PointsCacheError>;

    /// Store a body under the supplied key. Expiry is the adapter's concern.
    async fn set(&self, key: &PointsCacheKey, body: &ResponseBody) -> Result<(), PointsCacheError>;
}
