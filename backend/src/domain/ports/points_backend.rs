//! Driven port for the downstream points processing backend.
//!
//! Adapters own transport details (URL, timeouts, headers, decoding). The
//! domain only distinguishes failures that came with a response from
//! failures where no response was received.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{PointsPayload, ResponseBody};

define_port_error! {
    /// Errors raised while calling the processing backend.
    pub enum PointsBackendError {
        /// The backend answered with a non-success status.
        Rejected { status: u16, body: Option<Value> } =>
            "points backend responded with status {status}",
        /// The request timed out before a response arrived.
        Timeout { message: String } =>
            "points backend timed out: {message}",
        /// Connection or protocol failure; no response was received.
        Transport { message: String } =>
            "points backend transport failure: {message}",
    }
}

impl PointsBackendError {
    /// HTTP status reported by the backend, when a response was received.
    ///
    /// # Examples
    /// ```
    /// use point_relay::domain::ports::PointsBackendError;
    ///
    /// assert_eq!(PointsBackendError::rejected(502_u16, None).status(), Some(502));
    /// assert_eq!(PointsBackendError::transport("refused").status(), None);
    /// ```
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Timeout { .. } | Self::Transport { .. } => None,
        }
    }

    /// Error body returned by the backend, when one was received.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Rejected { body, .. } => body.as_ref(),
            Self::Timeout { .. } | Self::Transport { .. } => None,
        }
    }
}

/// Port for forwarding a payload to the processing backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointsBackend: Send + Sync {
    /// Send the full payload as the request body and return the response body.
    async fn process(&self, payload: &PointsPayload) -> Result<ResponseBody, PointsBackendError>;
}
