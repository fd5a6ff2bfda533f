//! Normalization of non-success response bodies.
//!
//! The management API usually answers failures with an ARM error envelope
//! (`{"error": {"code": ..., "message": ...}}`), but gateways and proxies in
//! front of it can return HTML, plain text or nothing at all. [`normalize`]
//! accepts any of these and never fails.

use std::fmt;

use serde_json::Value;

/// Uniform representation of an API failure body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    /// Indented JSON rendering of the body, or the body verbatim when it was
    /// not JSON. Empty for an empty body.
    pub message: String,
    /// The body exactly as received. `None` only for an empty body.
    pub raw_body: Option<String>,
    /// `true` when the body could not be parsed as JSON.
    pub is_parse_failure: bool,
    /// ARM `error.code`, when the body carried one.
    pub code: Option<String>,
}

/// Converts a failure body into a [`NormalizedError`].
pub fn normalize(body: &str) -> NormalizedError {
    if body.trim().is_empty() {
        return NormalizedError {
            message: String::new(),
            raw_body: None,
            is_parse_failure: false,
            code: None,
        };
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => NormalizedError {
            message: serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
            raw_body: Some(body.to_string()),
            is_parse_failure: false,
            code: value
                .pointer("/error/code")
                .and_then(Value::as_str)
                .map(str::to_owned),
        },
        Err(_) => NormalizedError {
            message: body.to_string(),
            raw_body: Some(body.to_string()),
            is_parse_failure: true,
            code: None,
        },
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str("(empty response body)")
        } else {
            f.write_str(&self.message)
        }
    }
}
