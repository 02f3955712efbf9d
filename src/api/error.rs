//! Error type shared by every backend call.

use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend request.
///
/// The `Display` text is what the console shows in its status line, so it
/// stays short (`HTTP 403`, `Request failed: ...`).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS, TLS or timeout failure before a status was received
    #[error("Request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("HTTP {status}")]
    Status {
        status: u16,
        /// Parsed response body (JSON when possible, raw text otherwise)
        body: Value,
    },

    /// The response arrived but did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Local file failure while saving a download or reading an upload
    #[error("File error: {0}")]
    Io(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body attached to the error, if the backend sent one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Status { body, .. } if !body.is_null() => Some(body),
            _ => None,
        }
    }

    /// Best human-readable detail: the backend's `message`/`error` field
    /// when present, otherwise the error itself.
    pub fn detail(&self) -> String {
        if let Some(body) = self.body() {
            for key in ["message", "error", "detail", "title"] {
                if let Some(msg) = body.get(key).and_then(|v| v.as_str()) {
                    if !msg.trim().is_empty() {
                        return format!("{} ({})", self, msg.trim());
                    }
                }
            }
        }
        self.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_display_is_short() {
        let err = ApiError::Status { status: 404, body: Value::Null };
        assert_eq!(err.to_string(), "HTTP 404");
        assert!(err.body().is_none());
    }

    #[test]
    fn detail_uses_backend_message() {
        let err = ApiError::Status {
            status: 409,
            body: json!({"message": "User already exists"}),
        };
        assert_eq!(err.detail(), "HTTP 409 (User already exists)");
        assert_eq!(err.status(), Some(409));
    }
}
