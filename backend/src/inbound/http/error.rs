//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error types HTTP-agnostic while allowing Actix
//! handlers to turn failures into consistent JSON responses and status codes.
//!
//! Two failure shapes reach clients:
//! - [`Error`]: the relay's own envelope, used for validation and internal
//!   failures.
//! - [`ProcessingError`]: a backend failure. When the backend supplied an
//!   error body it is returned verbatim with the backend's status; otherwise
//!   the envelope carries the generic failure message.

use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError, http::StatusCode};

use crate::domain::ports::ProcessingError;
pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER, TraceId};

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::UpstreamFailure | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

fn with_trace_header(builder: &mut HttpResponseBuilder, trace_id: Option<&str>) {
    if let Some(id) = trace_id {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        with_trace_header(&mut builder, self.trace_id());
        builder.json(redact_if_internal(self))
    }
}

impl ResponseError for ProcessingError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        let trace_id = TraceId::current().map(|id| id.to_string());
        with_trace_header(&mut builder, trace_id.as_deref());

        match self.detail() {
            Some(detail) => builder.json(detail),
            None => builder.json(Error::upstream_failure(self.message())),
        }
    }
}
