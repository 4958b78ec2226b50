//! Driving port used by inbound adapters to process a points payload.
//!
//! The [`PointsProcessing`] port hides the cache-aside orchestration from
//! transports. Failures come back as [`ProcessingError`], which already
//! carries the status and body the caller should see.

use async_trait::async_trait;
use serde_json::Value;

use super::PointsBackendError;
use crate::domain::response_body::is_empty_json;
use crate::domain::{PointsPayload, ResponseBody};

/// Fixed message returned when the backend provides no usable error detail.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process points.";

/// Status returned when the backend provides no status of its own.
pub const GENERIC_FAILURE_STATUS: u16 = 500;

/// Caller-facing failure translated from a backend error.
///
/// ## Invariants
/// - `status` is the backend's status when one was received, otherwise 500.
/// - `detail` is the backend's error body verbatim, or `None` when the
///   backend supplied nothing usable; callers then render
///   [`GENERIC_FAILURE_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("points processing failed with status {status}")]
pub struct ProcessingError {
    status: u16,
    detail: Option<Value>,
}

impl ProcessingError {
    /// Translate a backend failure into the caller-facing error.
    ///
    /// # Examples
    /// ```
    /// use point_relay::domain::ports::{PointsBackendError, ProcessingError};
    /// use serde_json::json;
    ///
    /// let err = ProcessingError::from_backend(PointsBackendError::rejected(
    ///     500_u16,
    ///     Some(json!({ "error": "X" })),
    /// ));
    /// assert_eq!(err.status(), 500);
    /// assert_eq!(err.detail(), Some(&json!({ "error": "X" })));
    ///
    /// let generic = ProcessingError::from_backend(PointsBackendError::transport("refused"));
    /// assert_eq!(generic.status(), 500);
    /// assert_eq!(generic.message(), "Failed to process points.");
    /// ```
    pub fn from_backend(error: PointsBackendError) -> Self {
        let status = error
            .status()
            .filter(|status| *status != 0)
            .unwrap_or(GENERIC_FAILURE_STATUS);
        let detail = error
            .body()
            .filter(|body| !is_empty_json(body))
            .cloned();
        Self { status, detail }
    }

    /// Generic failure used when nothing is known about the cause.
    pub fn generic() -> Self {
        Self {
            status: GENERIC_FAILURE_STATUS,
            detail: None,
        }
    }

    /// Status the caller should receive.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Backend error body to return verbatim, if any.
    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    /// Human-readable message for logs and generic responses.
    pub fn message(&self) -> &str {
        GENERIC_FAILURE_MESSAGE
    }
}

/// Driving port for cache-aside points processing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointsProcessing: Send + Sync {
    /// Return the processed result for the payload, fetching it from the
    /// backend at most once per distinct payload while the cache holds it.
    async fn process_points(&self, payload: &PointsPayload)
    -> Result<ResponseBody, ProcessingError>;
}

/// Fixture implementation echoing a fixed acknowledgement.
///
/// Used by HTTP tests that only exercise request validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePointsProcessing;

#[async_trait]
impl PointsProcessing for FixturePointsProcessing {
    async fn process_points(
        &self,
        payload: &PointsPayload,
    ) -> Result<ResponseBody, ProcessingError> {
        Ok(ResponseBody::new(serde_json::json!({
            "received": payload.points().len(),
        })))
    }
}
