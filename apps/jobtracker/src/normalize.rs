//! Error normalization for the backend's `{ timestamp, data, error }` envelope.
//!
//! The backend is not consistent about where it puts human-readable text:
//! validation failures arrive as a joined `message` string, some handlers send
//! a `message` array, and older endpoints use `messages`, `errors` or
//! `details`. Everything funnels through [`normalize_error`] so callers only
//! ever see a [`NormalizedError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields checked, in order, when `message` carries nothing usable.
const MESSAGE_BUCKETS: [&str; 3] = ["messages", "errors", "details"];

/// Shown for every 401, whatever the body says.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// The raw `message` field as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    List(Vec<String>),
}

/// Uniform error payload handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<ErrorMessage>,
    pub messages: Vec<String>,
    /// Never empty.
    pub primary_message: String,
}

impl NormalizedError {
    pub fn session_expired() -> Self {
        Self {
            status: 401,
            message: None,
            messages: Vec::new(),
            primary_message: SESSION_EXPIRED_MESSAGE.to_string(),
        }
    }

    /// Payload for failures that never produced an HTTP status (status 0).
    pub fn local(text: impl Into<String>) -> Self {
        let text = text.into();
        let primary_message = if text.trim().is_empty() {
            fallback_message(0)
        } else {
            text.clone()
        };
        Self {
            status: 0,
            message: Some(ErrorMessage::Text(text)),
            messages: vec![primary_message.clone()],
            primary_message,
        }
    }

    /// Messages worth showing under the primary one, minus repeats of it.
    pub fn supplementary_messages(&self) -> Vec<&str> {
        self.messages
            .iter()
            .map(String::as_str)
            .filter(|m| *m != self.primary_message)
            .collect()
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.primary_message)
    }
}

/// Builds a [`NormalizedError`] from the envelope's `error` field (if any)
/// and the HTTP status of the response.
///
/// Anything other than a JSON object is treated as "no error object".
pub fn normalize_error(api_error: Option<&Value>, status_code: u16) -> NormalizedError {
    let object = api_error.and_then(Value::as_object);

    let status = object
        .and_then(|o| o.get("status"))
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(status_code);

    let raw_message = object.and_then(|o| o.get("message"));
    let messages = derive_messages(object, raw_message);

    let primary_message = messages
        .first()
        .cloned()
        .unwrap_or_else(|| fallback_message(status));

    NormalizedError {
        status,
        message: raw_message.and_then(error_message),
        messages,
        primary_message,
    }
}

fn derive_messages(object: Option<&Map<String, Value>>, message: Option<&Value>) -> Vec<String> {
    match message {
        Some(Value::Array(items)) => return coerce_messages(items),
        Some(Value::String(text)) if !text.trim().is_empty() => return vec![text.clone()],
        _ => {}
    }

    let Some(object) = object else {
        return Vec::new();
    };

    MESSAGE_BUCKETS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))
        .map(|items| coerce_messages(items))
        .unwrap_or_default()
}

fn error_message(value: &Value) -> Option<ErrorMessage> {
    match value {
        Value::String(text) => Some(ErrorMessage::Text(text.clone())),
        Value::Array(items) => Some(ErrorMessage::List(
            items.iter().filter_map(coerce_message).collect(),
        )),
        _ => None,
    }
}

fn coerce_messages(items: &[Value]) -> Vec<String> {
    items.iter().filter_map(coerce_message).collect()
}

/// Falsy entries (null, false, 0, "") are dropped; everything else becomes text.
fn coerce_message(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    Some(match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

/// JSON truthiness as the backend's web clients see it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn fallback_message(status: u16) -> String {
    format!("Request failed ({status})")
}
