//! Domain primitives and the cache-aside forwarding service.
//!
//! Purpose: define strongly typed points payloads, the content-addressed
//! cache key derivation, and the orchestration that consults a cache before
//! forwarding to the processing backend. Adapters live under `inbound` and
//! `outbound`; this module never depends on them.
//!
//! Public surface:
//! - Point / PointsPayload: validated request data.
//! - ResponseBody: opaque JSON returned by the backend.
//! - fingerprint: derives the cache key for a payload.
//! - CacheAsideForwarder: the `PointsProcessing` implementation.
//! - Error / ErrorCode: client-facing error envelope.
//! - TraceId: task-local request correlation identifier.

pub mod error;
mod fingerprint;
mod points;
mod points_forwarder;
pub mod ports;
mod response_body;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::fingerprint::fingerprint;
pub use self::points::{Point, PointValidationError, PointsPayload};
pub use self::points_forwarder::CacheAsideForwarder;
pub use self::response_body::ResponseBody;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use point_relay::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::invalid_request("points must not be empty"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
