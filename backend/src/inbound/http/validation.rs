//! Boundary validation for points request bodies.
//!
//! Bodies are accepted as raw JSON and checked field by field so every
//! violation names its path (`points[1].lng`). The checks are strict:
//! numbers are never coerced from strings, unknown properties are rejected
//! at every level, and the points list must be non-empty. All violations are
//! collected before responding.

use serde_json::{Map, Value, json};

use crate::domain::{Error, Point, PointValidationError, PointsPayload};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MalformedBody,
    MissingField,
    UnknownField,
    InvalidType,
    EmptyArray,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MissingField => "missing_field",
            ErrorCode::UnknownField => "unknown_field",
            ErrorCode::InvalidType => "invalid_type",
            ErrorCode::EmptyArray => "empty_array",
            ErrorCode::OutOfRange => "out_of_range",
        }
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq)]
struct Violation {
    field: String,
    code: ErrorCode,
    message: String,
}

impl Violation {
    fn new(field: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "field": self.field,
            "code": self.code.as_str(),
            "message": self.message,
        })
    }
}

#[derive(Debug, Default)]
struct Violations(Vec<Violation>);

impl Violations {
    fn push(&mut self, field: impl Into<String>, code: ErrorCode, message: impl Into<String>) {
        self.0.push(Violation::new(field, code, message));
    }

    fn reject_unknown(&mut self, object: &Map<String, Value>, allowed: &[&str], prefix: &str) {
        for key in object.keys().filter(|key| !allowed.contains(&key.as_str())) {
            let path = format!("{prefix}{key}");
            let message = format!("property {path} should not exist");
            self.push(path, ErrorCode::UnknownField, message);
        }
    }

    fn into_error(self) -> Error {
        let message = self
            .0
            .iter()
            .map(|violation| violation.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let details: Vec<Value> = self.0.iter().map(Violation::to_json).collect();
        Error::invalid_request(message).with_details(json!({ "violations": details }))
    }
}

/// Error returned when the body is not parseable JSON.
pub(crate) fn malformed_body_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("request body must be valid JSON: {reason}")).with_details(
        json!({
            "code": ErrorCode::MalformedBody.as_str(),
        }),
    )
}

fn coordinate(
    point: &Map<String, Value>,
    name: &str,
    prefix: &str,
    check: fn(f64) -> Result<f64, PointValidationError>,
    out: &mut Violations,
) -> Option<f64> {
    let path = format!("{prefix}{name}");
    match point.get(name) {
        None => {
            let message = format!("{path} is required");
            out.push(path, ErrorCode::MissingField, message);
            None
        }
        Some(Value::Number(number)) => {
            let value = number.as_f64()?;
            match check(value) {
                Ok(value) => Some(value),
                Err(error) => {
                    let message = format!("{prefix}{error}");
                    out.push(path, ErrorCode::OutOfRange, message);
                    None
                }
            }
        }
        Some(_) => {
            let message = format!("{path} must be a number");
            out.push(path, ErrorCode::InvalidType, message);
            None
        }
    }
}

fn point_at(index: usize, value: &Value, out: &mut Violations) -> Option<Point> {
    let prefix = format!("points[{index}]");
    let Some(object) = value.as_object() else {
        let message = format!("{prefix} must be an object");
        out.push(prefix, ErrorCode::InvalidType, message);
        return None;
    };

    let field_prefix = format!("{prefix}.");
    out.reject_unknown(object, &["lat", "lng"], &field_prefix);
    let lat = coordinate(object, "lat", &field_prefix, Point::check_lat, out);
    let lng = coordinate(object, "lng", &field_prefix, Point::check_lng, out);
    Point::new(lat?, lng?).ok()
}

/// Validate a raw JSON body and build the domain payload.
pub(crate) fn parse_points_payload(body: &Value) -> Result<PointsPayload, Error> {
    let mut violations = Violations::default();

    let Some(root) = body.as_object() else {
        violations.push(
            "",
            ErrorCode::InvalidType,
            "request body must be a JSON object",
        );
        return Err(violations.into_error());
    };
    violations.reject_unknown(root, &["points"], "");

    let points = match root.get("points") {
        None => {
            violations.push("points", ErrorCode::MissingField, "points is required");
            None
        }
        Some(Value::Array(items)) if items.is_empty() => {
            violations.push(
                "points",
                ErrorCode::EmptyArray,
                "points must contain at least one point",
            );
            None
        }
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| point_at(index, item, &mut violations))
                .collect::<Vec<_>>(),
        ),
        Some(_) => {
            violations.push("points", ErrorCode::InvalidType, "points must be an array");
            None
        }
    };

    if !violations.0.is_empty() {
        return Err(violations.into_error());
    }
    let points = points.unwrap_or_default();
    PointsPayload::new(points).map_err(|error| Error::invalid_request(error.to_string()))
}
