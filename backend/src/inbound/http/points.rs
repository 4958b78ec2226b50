//! Points API handler.
//!
//! ```text
//! POST /points  Process a list of coordinates, served from cache when possible
//! ```

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, post, web};
use serde_json::Value;
use tracing::debug;

use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{malformed_body_error, parse_points_payload};

/// Request body schema for `POST /points`.
///
/// Only used for documentation; bodies are validated field by field so each
/// violation can be reported with its path.
#[derive(utoipa::ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PointsRequestSchema {
    /// Ordered, non-empty list of coordinates.
    #[schema(min_items = 1)]
    points: Vec<PointSchema>,
}

/// A single coordinate.
#[derive(utoipa::ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PointSchema {
    /// Latitude in degrees.
    #[schema(minimum = -90.0, maximum = 90.0, example = 40.7128)]
    lat: f64,
    /// Longitude in degrees.
    #[schema(minimum = -180.0, maximum = 180.0, example = -74.006)]
    lng: f64,
}

/// JSON extractor configuration rendering body errors as relay envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        malformed_body_error(&err).into()
    })
}

/// Process a points payload.
///
/// Identical payloads (same points in the same order) are served from the
/// cache while the entry lives; otherwise the payload is forwarded to the
/// processing backend and a successful result is cached. Backend failures
/// return the backend's status and error body.
#[utoipa::path(
    post,
    path = "/points",
    request_body = PointsRequestSchema,
    responses(
        (status = 200, description = "Processed result from the backend", body = Object),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Backend failure without detail", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "processPoints"
)]
#[post("/points")]
pub async fn process_points(
    state: web::Data<HttpState>,
    body: web::Json<Value>,
) -> actix_web::Result<HttpResponse> {
    let payload = parse_points_payload(&body)?;
    debug!(points = payload.points().len(), "points request accepted");
    let result = state.points.process_points(&payload).await?;
    Ok(HttpResponse::Ok().json(result))
}
