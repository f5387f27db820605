//! Classified failures of the remote resource accessor.
//!
//! Every call through [`ApiClient`](crate::api::ApiClient) fails with
//! exactly one [`ApiError`] variant. The type is `Clone` so one in-flight
//! request can hand the same failure to every caller that shared it.

use learnhub_core::error::CoreError;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, TLS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a 4xx status.
    #[error("Client error ({status}): {message}")]
    Client {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The backend answered with a 5xx (or otherwise unexpected) status.
    #[error("Server error ({status}): {message}")]
    Server {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A success response whose body does not match the expected model.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The request could not be built (bad URL, unserializable body).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A client-side guard rejected the input before anything was sent.
    #[error(transparent)]
    Validation(#[from] CoreError),
}

/// The error body shapes the backend is known to produce.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    error: Option<String>,
    message: Option<String>,
    code: Option<String>,
}

impl ApiError {
    /// Build an error from a non-success status and its raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let message = parsed
            .message
            .or(parsed.error)
            .or_else(|| match parsed.detail {
                Some(serde_json::Value::String(s)) => Some(s),
                Some(serde_json::Value::Array(items)) => items
                    .first()
                    .and_then(|i| i.get("msg"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string),
                _ => None,
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() || trimmed.starts_with('<') {
                    format!("HTTP {status}")
                } else {
                    trimmed.to_string()
                }
            });

        if (400..500).contains(&status) {
            Self::Client {
                status,
                code: parsed.code,
                message,
            }
        } else {
            Self::Server {
                status,
                code: parsed.code,
                message,
            }
        }
    }

    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend error code, if the body carried one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Client { code, .. } | Self::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// One-line text suitable for a toast notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection and try again.".to_string(),
            Self::Client { status: 401, .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Client { status: 403, .. } => {
                "You don't have permission to do that.".to_string()
            }
            Self::Client { status: 404, .. } => "The requested item was not found.".to_string(),
            Self::Client { message, .. } => first_line(message),
            Self::Server { .. } => "Server error. Please try again later.".to_string(),
            Self::Decode(_) => "Unexpected response from the server.".to_string(),
            Self::InvalidRequest(_) => "The request could not be sent.".to_string(),
            Self::Validation(CoreError::Validation(msg)) => first_line(msg),
            Self::Validation(other) => first_line(&other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or_default().trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
