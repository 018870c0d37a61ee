//! Record envelope extraction

use crate::error::{Error, Result};
use serde_json::Value;

/// Wrapper key v1 responses nest their payload under
pub const V1_RESPONSE_KEY: &str = "response";

/// Where the record array lives inside a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// The body is the array
    Body,
    /// `body[key]` is the array
    Key(String),
    /// `body["response"][key]` is the array
    Nested(String),
}

impl Envelope {
    /// Pick the envelope for an optional result key
    pub fn for_key(result_key: Option<&str>) -> Self {
        match result_key {
            Some(key) => Self::Key(key.to_string()),
            None => Self::Body,
        }
    }

    /// Extract the records of one page.
    ///
    /// `endpoint` only feeds error messages.
    pub fn extract(&self, body: Value, endpoint: &str) -> Result<Vec<Value>> {
        match self {
            Envelope::Body => into_records(body, endpoint, "(top-level array)"),
            Envelope::Key(key) => {
                let Value::Object(mut map) = body else {
                    return Err(Error::schema(endpoint, key.as_str()));
                };
                let inner = map
                    .remove(key)
                    .ok_or_else(|| Error::schema(endpoint, key.as_str()))?;
                into_records(inner, endpoint, key)
            }
            Envelope::Nested(key) => {
                let path = format!("{V1_RESPONSE_KEY}.{key}");
                let mut response = match body {
                    Value::Object(mut map) => match map.remove(V1_RESPONSE_KEY) {
                        Some(Value::Object(response)) => response,
                        _ => return Err(Error::schema(endpoint, V1_RESPONSE_KEY)),
                    },
                    _ => return Err(Error::schema(endpoint, V1_RESPONSE_KEY)),
                };
                let inner = response
                    .remove(key)
                    .ok_or_else(|| Error::schema(endpoint, path.as_str()))?;
                into_records(inner, endpoint, &path)
            }
        }
    }
}

fn into_records(value: Value, endpoint: &str, key: &str) -> Result<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Null => Ok(Vec::new()),
        _ => Err(Error::schema(endpoint, key)),
    }
}

/// Parse a response body and extract its records
pub fn decode_body(text: &str, envelope: &Envelope, endpoint: &str) -> Result<Vec<Value>> {
    let body: Value = serde_json::from_str(text)?;
    envelope.extract(body, endpoint)
}
