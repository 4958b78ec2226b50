//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::PointsProcessing;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub points: Arc<dyn PointsProcessing>,
}

impl HttpState {
    /// Construct state from the points processing port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use point_relay::domain::ports::FixturePointsProcessing;
    /// use point_relay::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixturePointsProcessing));
    /// let _points = state.points.clone();
    /// ```
    pub fn new(points: Arc<dyn PointsProcessing>) -> Self {
        Self { points }
    }
}
