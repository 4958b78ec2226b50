//! Point relay library modules.
//!
//! A caching relay in front of a coordinate-processing backend: identical
//! payloads are answered from a content-addressed cache, everything else is
//! forwarded and successful results are stored.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
