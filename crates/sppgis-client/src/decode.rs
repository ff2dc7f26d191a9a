//! Response decoder: HTTP status mapping plus fail-closed JSON shape checks.
//!
//! Every endpoint family declares the top-level shape it expects; anything
//! else is `MalformedResponse`. Well-formed error statuses always map to a
//! typed kind so callers can render a specific message instead of a raw
//! status code.

use crate::error::{Result, SppError};
use crate::transport::RawResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Expected top-level shape of a JSON response body
#[derive(Debug, Clone, Copy)]
pub enum ExpectedShape {
    /// A JSON object
    Object,
    /// A JSON object containing all of the listed keys
    ObjectWithKeys(&'static [&'static str]),
    /// A JSON array
    Array,
}

/// Decode a JSON body after status classification
pub fn decode_json(raw: &RawResponse, shape: ExpectedShape, resource: &str) -> Result<Value> {
    check_status(raw, resource)?;

    let value: Value = serde_json::from_slice(&raw.body).map_err(|e| {
        SppError::MalformedResponse { detail: format!("{}: invalid JSON: {}", resource, e) }
    })?;

    match shape {
        ExpectedShape::Object => {
            if !value.is_object() {
                return Err(shape_error(resource, "object", &value));
            }
        }
        ExpectedShape::ObjectWithKeys(keys) => {
            let Some(object) = value.as_object() else {
                return Err(shape_error(resource, "object", &value));
            };
            for key in keys {
                if !object.contains_key(*key) {
                    return Err(SppError::MalformedResponse {
                        detail: format!("{}: missing required field '{}'", resource, key),
                    });
                }
            }
        }
        ExpectedShape::Array => {
            if !value.is_array() {
                return Err(shape_error(resource, "array", &value));
            }
        }
    }

    Ok(value)
}

/// Decode a raw (non-JSON) body after status classification
pub fn decode_raw(raw: RawResponse, resource: &str) -> Result<Vec<u8>> {
    check_status(&raw, resource)?;
    Ok(raw.body)
}

/// Deserialize a decoded value into a typed entity
pub fn decode_as<T: DeserializeOwned>(value: Value, resource: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| SppError::MalformedResponse {
        detail: format!("{}: unexpected field types: {}", resource, e),
    })
}

fn shape_error(resource: &str, expected: &str, value: &Value) -> SppError {
    let got = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    SppError::MalformedResponse {
        detail: format!("{}: expected top-level {}, got {}", resource, expected, got),
    }
}

/// Map an HTTP status onto the error taxonomy. 2xx passes through.
fn check_status(raw: &RawResponse, resource: &str) -> Result<()> {
    match raw.status {
        200..=299 => Ok(()),
        401 | 403 => Err(SppError::AuthenticationFailed),
        404 => Err(SppError::NotFound { resource: resource.to_string() }),
        400..=499 => Err(SppError::ClientRequest {
            status: raw.status,
            message: server_message(&raw.body),
        }),
        s if s >= 500 => Err(SppError::Server { status: s }),
        s => Err(SppError::MalformedResponse {
            detail: format!("{}: unexpected HTTP status {}", resource, s),
        }),
    }
}

/// Best-effort extraction of a server-supplied error message
fn server_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "detail", "error"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "no detail provided".to_string()
    } else {
        text.chars().take(200).collect()
    }
}
