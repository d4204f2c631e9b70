use refill_core::Record;
use serde_json::Value;

use crate::normalize::normalize_free_text;

/// Response body that did not decode into a string-to-string mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DecodeError {
    pub message: String,
    /// The body exactly as received.
    pub raw: String,
    /// Normalized rendering when the body was a JSON string holding free text.
    pub free_text: Option<String>,
}

impl DecodeError {
    fn new(message: impl Into<String>, raw: &str) -> Self {
        Self {
            message: message.into(),
            raw: raw.to_string(),
            free_text: None,
        }
    }
}

/// Decodes a response body into a record.
///
/// A top-level JSON string is unwrapped once and decoded again, since the
/// service may double-encode its answer. Either the whole mapping is accepted
/// or the attempt fails.
pub fn parse_response(raw: &str) -> Result<Record, DecodeError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| DecodeError::new(format!("response is not valid JSON: {err}"), raw))?;
    match value {
        Value::String(inner) => parse_unwrapped(&inner, raw),
        other => record_from_value(other, raw),
    }
}

fn parse_unwrapped(inner: &str, raw: &str) -> Result<Record, DecodeError> {
    match serde_json::from_str::<Value>(inner) {
        Ok(value) => record_from_value(value, raw),
        Err(err) => {
            let mut decode_err = DecodeError::new(
                format!("response is a JSON string without a JSON object inside: {err}"),
                raw,
            );
            decode_err.free_text = Some(normalize_free_text(inner));
            Err(decode_err)
        }
    }
}

fn record_from_value(value: Value, raw: &str) -> Result<Record, DecodeError> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(DecodeError::new(
                format!("expected a JSON object of strings, found {}", kind_of(&other)),
                raw,
            ))
        }
    };
    map.into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => Ok((key, text)),
            other => Err(DecodeError::new(
                format!("value for key `{key}` is {}, expected a string", kind_of(&other)),
                raw,
            )),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pretty-prints a record with two-space indentation for display.
pub fn render_record(record: &Record) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|_| format!("{record:?}"))
}
