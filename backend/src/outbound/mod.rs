//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **cache**: in-memory and Redis-backed implementations of `PointsCache`
//! - **points_backend**: reqwest implementation of `PointsBackend`
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod cache;
pub mod points_backend;
