//! Opaque backend response bodies.

use serde::Serialize;
use serde_json::Value;

/// JSON body produced by the processing backend.
///
/// The relay never inspects the content beyond deciding whether it is
/// "empty": `null`, `false`, numeric zero, and the empty string carry no
/// usable result. Empty bodies are not served from the cache and are not
/// forwarded as error detail.
///
/// # Examples
/// ```
/// use point_relay::domain::ResponseBody;
/// use serde_json::json;
///
/// assert!(ResponseBody::new(json!(null)).is_empty());
/// assert!(!ResponseBody::new(json!({})).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseBody(Value);

impl ResponseBody {
    /// Wrap a JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Whether the body carries no usable content.
    pub fn is_empty(&self) -> bool {
        is_empty_json(&self.0)
    }

    /// Borrow the JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the wrapper, yielding the JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

pub(crate) fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => false,
    }
}
