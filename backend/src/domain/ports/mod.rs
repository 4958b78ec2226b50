//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (cache stores, the processing backend) and how driving adapters (HTTP
//! handlers) reach the domain. Each trait exposes strongly typed errors so
//! adapters map their failures into predictable variants instead of
//! returning `anyhow::Result`.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod points_backend;
mod points_cache;
mod points_processing;

pub use cache_key::{CACHE_KEY_LEN, PointsCacheKey, PointsCacheKeyValidationError};
#[cfg(test)]
pub use points_backend::MockPointsBackend;
pub use points_backend::{PointsBackend, PointsBackendError};
#[cfg(test)]
pub use points_cache::MockPointsCache;
pub use points_cache::{PointsCache, PointsCacheError};
#[cfg(test)]
pub use points_processing::MockPointsProcessing;
pub use points_processing::{
    FixturePointsProcessing, GENERIC_FAILURE_MESSAGE, GENERIC_FAILURE_STATUS, PointsProcessing,
    ProcessingError,
};
