//! Processing backend adapters.
//!
//! This module provides the reqwest implementation of the `PointsBackend`
//! port.

mod http_backend;

pub use http_backend::{HttpPointsBackend, PointsBackendIdentity};
