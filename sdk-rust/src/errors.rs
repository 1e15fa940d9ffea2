use serde_json::Value;
use thiserror::Error;

/// Error from calling a Studyhall or game engine API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request input is invalid.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// HTTP client error.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API returned a non-success status code.
    /// The second field carries the raw response body.
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// An invariant expected by the library was violated.
    /// This is usually a bug in the backend or in the library.
    #[error("Invariant from {0}: {1}")]
    Invariant(&'static str, String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Pulls the human-readable failure reason out of an error response
    /// body, if the backend supplied one. Studyhall endpoints report a
    /// `detail` field, the game engine reports `error`.
    #[must_use]
    pub fn backend_detail(&self) -> Option<String> {
        match self {
            Self::StatusCode(_, body) => extract_detail(body),
            _ => None,
        }
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    for field in ["detail", "error"] {
        match value.get(field) {
            Some(Value::String(text)) => {
                if !text.trim().is_empty() {
                    return Some(text.trim().to_string());
                }
            }
            // FastAPI validation errors carry a structured `detail`.
            Some(other) if !other.is_null() => return Some(other.to_string()),
            _ => {}
        }
    }
    None
}
