use serde_json::{json, Value};

use super::client::api_call;
use super::{ApiContext, ApiError};

/// `POST /login`. The raw response is returned so the caller can keep it.
pub async fn login(ctx: &ApiContext, email: &str, password: &str) -> Result<Value, ApiError> {
    let body = json!({ "email": email, "password": password });
    api_call(ctx, "POST", "/login", Some(body), None).await
}

/// `GET /currentuser`, the gate's role probe.
pub async fn current_user(ctx: &ApiContext) -> Result<Value, ApiError> {
    api_call(ctx, "GET", "/currentuser", None, None).await
}

/// Message for a failed login: the backend's `message` or the status.
pub fn login_failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { status, body } => body
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.trim().is_empty())
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Login failed ({})", status)),
        ApiError::Transport(e) => format!("Network error: {}", e),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_failure_prefers_backend_message() {
        let err = ApiError::Status { status: 401, body: json!({"message": "Wrong password"}) };
        assert_eq!(login_failure_message(&err), "Wrong password");
        let err = ApiError::Status { status: 502, body: json!("Bad gateway") };
        assert_eq!(login_failure_message(&err), "Login failed (502)");
    }
}
