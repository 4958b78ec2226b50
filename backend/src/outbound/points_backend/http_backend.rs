//! Reqwest-backed processing backend adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and decoding the response body as opaque JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::domain::ports::{PointsBackend, PointsBackendError};
use crate::domain::{PointsPayload, ResponseBody};

const DEFAULT_USER_AGENT: &str = concat!("point-relay/", env!("CARGO_PKG_VERSION"));

/// Outbound identity sent with backend requests.
pub struct PointsBackendIdentity {
    /// HTTP user-agent sent to the backend.
    pub user_agent: String,
}

impl Default for PointsBackendIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Backend adapter that POSTs payloads to one endpoint.
pub struct HttpPointsBackend {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl HttpPointsBackend {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(endpoint, timeout, PointsBackendIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        endpoint: Url,
        timeout: Duration,
        identity: PointsBackendIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            user_agent: identity.user_agent,
        })
    }

    /// Endpoint every payload is posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PointsBackend for HttpPointsBackend {
    async fn process(&self, payload: &PointsPayload) -> Result<ResponseBody, PointsBackendError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        Ok(ResponseBody::new(decode_body(body.as_ref()).unwrap_or(Value::Null)))
    }
}

/// Decode a response body: JSON when possible, raw text otherwise, `None`
/// when the body is blank.
fn decode_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(body)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(body).into_owned())))
}

fn map_transport_error(error: reqwest::Error) -> PointsBackendError {
    if error.is_timeout() {
        PointsBackendError::timeout(error.to_string())
    } else {
        PointsBackendError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PointsBackendError {
    PointsBackendError::rejected(status.as_u16(), decode_body(body))
}
