//! Error types for the Gradient API client.
//!
//! # Design
//! Four outcomes are kept apart because callers treat them differently:
//! the request never completed (`Transport`), the server said "ok" but sent
//! something that does not fit the schema (`MalformedResponse`), the server
//! rejected the call with a readable message (`Api`), or it failed without
//! one (`Unknown`). Error bodies come in several shapes; `from_response`
//! normalizes them.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// The API operation a request belongs to. Used to word error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetCluster,
    ListClusters,
    CreateHyperparameter,
    ListHyperparameters,
    GetHyperparameter,
    StartHyperparameter,
}

impl Operation {
    /// Gerund phrase completing "Unknown error while ...".
    pub fn activity(self) -> &'static str {
        match self {
            Operation::GetCluster => "getting cluster",
            Operation::ListClusters => "listing clusters",
            Operation::CreateHyperparameter => "creating hyperparameter",
            Operation::ListHyperparameters => "listing hyperparameters",
            Operation::GetHyperparameter => "getting hyperparameter",
            Operation::StartHyperparameter => "starting hyperparameter",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.activity())
    }
}

/// Extra information attached to an API error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    Text(String),
    /// Per-field messages in the order the server sent them.
    Fields(Vec<(String, String)>),
}

/// Errors returned by `GradientClient` and the transport.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP round-trip did not complete.
    #[error("request failed: {0}")]
    Transport(String),

    /// A success status with a body that does not match the expected schema.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A non-success status with a structured message.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<ErrorDetail>,
    },

    /// A non-success status without a usable body.
    #[error("Unknown error while {operation}")]
    Unknown { status: u16, operation: Operation },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Normalize a non-success response body into an `ApiError`.
    ///
    /// Recognized shapes, in order: `{"error": "...", "details": ...}`,
    /// `{"error": {"message": "..."}}`, `{"message": "...", "status": ...}`.
    /// Anything else, including an empty body, is `Unknown`.
    pub fn from_response(operation: Operation, status: u16, body: &str) -> Self {
        let unknown = ApiError::Unknown { status, operation };

        let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
            debug!(status, %operation, "error response without a JSON object body");
            return unknown;
        };

        let Some(message) = error_message(&fields) else {
            debug!(status, %operation, "error response without a message");
            return unknown;
        };

        let detail = fields.get("details").and_then(error_detail);
        ApiError::Api {
            status,
            message,
            detail,
        }
    }
}

fn error_message(fields: &Map<String, Value>) -> Option<String> {
    let from_error = match fields.get("error") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(Value::Object(inner)) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    from_error.or_else(|| {
        fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

fn error_detail(details: &Value) -> Option<ErrorDetail> {
    match details {
        Value::String(text) if !text.is_empty() => Some(ErrorDetail::Text(text.clone())),
        Value::Array(parts) if !parts.is_empty() => Some(ErrorDetail::Text(flatten_message(details))),
        Value::Object(map) if !map.is_empty() => Some(ErrorDetail::Fields(
            map.iter()
                .map(|(field, message)| (field.clone(), flatten_message(message)))
                .collect(),
        )),
        _ => None,
    }
}

/// Field messages arrive as a string or a list of strings.
fn flatten_message(message: &Value) -> String {
    match message {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .map(flatten_message)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}
