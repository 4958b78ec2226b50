//! Payload fingerprinting for content-addressed caching.
//!
//! A payload is reduced to canonical compact JSON and hashed:
//!
//! 1. Object keys are sorted (`serde_json::Map` keeps keys ordered).
//! 2. Point order is preserved, so reordering points changes the key.
//! 3. SHA-256 is computed on the UTF-8 bytes and rendered as lowercase hex.

use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use super::PointsPayload;
use super::ports::PointsCacheKey;

/// Derive the cache key for a payload.
///
/// # Example
///
/// ```
/// use point_relay::domain::{Point, PointsPayload, fingerprint};
///
/// let payload = PointsPayload::new(vec![Point::new(1.0, 2.0).expect("valid")])
///     .expect("valid payload");
/// assert_eq!(fingerprint(&payload), fingerprint(&payload.clone()));
/// assert_eq!(fingerprint(&payload).as_str().len(), 64);
/// ```
pub fn fingerprint(payload: &PointsPayload) -> PointsCacheKey {
    let canonical = canonical_json(payload).to_string();
    let digest: [u8; 32] = Sha256::digest(canonical.as_bytes()).into();
    PointsCacheKey::from_digest(&digest)
}

fn canonical_json(payload: &PointsPayload) -> Value {
    let points = payload
        .points()
        .iter()
        .map(|point| json!({ "lat": point.lat(), "lng": point.lng() }))
        .collect();

    let mut root = Map::new();
    root.insert("points".to_owned(), Value::Array(points));
    Value::Object(root)
}
