//! Interpretation of a response body once the 401 check has passed.

use serde_json::Value;

use crate::errors::ApiError;
use crate::normalize::{is_truthy, normalize_error};

/// Parses the body as JSON. Anything unparseable (HTML error pages, empty
/// bodies) counts as "no envelope".
pub fn parse_envelope(body: &[u8]) -> Option<Value> {
    serde_json::from_slice(body).ok()
}

/// Applies the envelope contract to a non-401 response and returns the
/// payload the caller asked for.
///
/// A 2xx status is not enough: a truthy `error` field fails the call too.
/// Bodies that carry neither `data` nor `error` are legacy responses and are
/// returned whole.
pub fn unwrap_envelope(status: u16, envelope: Option<Value>) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        let error = envelope.as_ref().and_then(|e| e.get("error"));
        return Err(ApiError::Rejected(normalize_error(error, status)));
    }

    match envelope {
        Some(Value::Object(mut fields)) if fields.contains_key("data") || fields.contains_key("error") => {
            if let Some(error) = fields.get("error").filter(|e| is_truthy(e)) {
                return Err(ApiError::Rejected(normalize_error(Some(error), status)));
            }
            Ok(fields.remove("data").unwrap_or(Value::Null))
        }
        Some(body) => Ok(body),
        None => Ok(Value::Null),
    }
}
