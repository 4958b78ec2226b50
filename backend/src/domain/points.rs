//! Geographic points payload accepted by the relay.
//!
//! A [`PointsPayload`] is an ordered, non-empty list of [`Point`] values.
//! Both types validate on construction so the forwarder can rely on the
//! invariants without re-checking them:
//!
//! - latitude is finite and within `[-90, 90]`;
//! - longitude is finite and within `[-180, 180]`;
//! - the payload holds at least one point, in caller order.
//!
//! The serialised shape is the wire shape forwarded to the backend:
//!
//! ```text
//! {"points":[{"lat":40.7128,"lng":-74.006}]}
//! ```

use serde::Serialize;
use thiserror::Error;

const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Validation errors raised when constructing [`Point`] or [`PointsPayload`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointValidationError {
    /// Latitude is NaN, infinite, or outside `[-90, 90]`.
    #[error("lat must be a latitude within [-90, 90], got {value}")]
    LatitudeOutOfRange { value: f64 },
    /// Longitude is NaN, infinite, or outside `[-180, 180]`.
    #[error("lng must be a longitude within [-180, 180], got {value}")]
    LongitudeOutOfRange { value: f64 },
    /// The payload contained no points.
    #[error("points must contain at least 1 element")]
    EmptyPayload,
}

/// A single WGS84 coordinate pair.
///
/// # Examples
/// ```
/// use point_relay::domain::Point;
///
/// let point = Point::new(40.7128, -74.006).expect("valid point");
/// assert_eq!(point.lat(), 40.7128);
/// assert!(Point::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    lat: f64,
    lng: f64,
}

impl Point {
    /// Validate and construct a point.
    ///
    /// Latitude is checked first; use [`Point::check_lat`] and
    /// [`Point::check_lng`] to report both coordinates independently.
    pub fn new(lat: f64, lng: f64) -> Result<Self, PointValidationError> {
        Ok(Self {
            lat: Self::check_lat(lat)?,
            lng: Self::check_lng(lng)?,
        })
    }

    /// Check a latitude on its own.
    pub fn check_lat(lat: f64) -> Result<f64, PointValidationError> {
        if lat.is_finite() && LATITUDE_RANGE.contains(&lat) {
            Ok(lat)
        } else {
            Err(PointValidationError::LatitudeOutOfRange { value: lat })
        }
    }

    /// Check a longitude on its own.
    pub fn check_lng(lng: f64) -> Result<f64, PointValidationError> {
        if lng.is_finite() && LONGITUDE_RANGE.contains(&lng) {
            Ok(lng)
        } else {
            Err(PointValidationError::LongitudeOutOfRange { value: lng })
        }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Ordered, non-empty sequence of points forwarded to the backend.
///
/// # Examples
/// ```
/// use point_relay::domain::{Point, PointsPayload};
///
/// let payload = PointsPayload::new(vec![Point::new(1.0, 1.0).expect("valid")])
///     .expect("non-empty payload");
/// assert_eq!(payload.points().len(), 1);
/// assert!(PointsPayload::new(Vec::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsPayload {
    points: Vec<Point>,
}

impl PointsPayload {
    /// Construct a payload, rejecting an empty point list.
    pub fn new(points: Vec<Point>) -> Result<Self, PointValidationError> {
        if points.is_empty() {
            return Err(PointValidationError::EmptyPayload);
        }
        Ok(Self { points })
    }

    /// Borrow the points in caller order.
    pub fn points(&self) -> &[Point] {
        self.points.as_slice()
    }
}
