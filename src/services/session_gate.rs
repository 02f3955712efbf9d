//! Admission check run whenever a stored credential is about to be used.
//!
//! The stored token is probed against `/currentuser`; only the admin levels
//! are let in. Any other outcome wipes the credential store, so a failed
//! check always ends logged out.

use serde_json::Value;

use crate::api::auth::current_user;
use crate::api::{ApiContext, ApiError};
use crate::models::{CredentialStore, CurrentUser, RoleCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    NoCredentials,
    Transport(String),
    Rejected(u16),
    Undecodable,
    RoleNotAllowed(RoleCode),
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::NoCredentials => write!(f, "Not logged in"),
            DenyReason::Transport(e) => write!(f, "Session check failed: {}", e),
            DenyReason::Rejected(status) => write!(f, "Session rejected (HTTP {})", status),
            DenyReason::Undecodable => write!(f, "Session check returned an unreadable response"),
            DenyReason::RoleNotAllowed(role) => {
                write!(f, "Role {} ({}) may not use this console", role, role.label().text)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Granted(CurrentUser),
    Denied(DenyReason),
}

impl GateDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, GateDecision::Granted(_))
    }
}

/// Decision for a `/currentuser` outcome, without touching any store.
pub fn decide(result: Result<Value, ApiError>) -> GateDecision {
    match result {
        Ok(payload @ Value::Object(_)) => {
            let user = CurrentUser::from_payload(&payload);
            if user.role.can_use_console() {
                GateDecision::Granted(user)
            } else {
                GateDecision::Denied(DenyReason::RoleNotAllowed(user.role))
            }
        }
        Ok(_) => GateDecision::Denied(DenyReason::Undecodable),
        Err(ApiError::Status { status, .. }) => GateDecision::Denied(DenyReason::Rejected(status)),
        Err(ApiError::Decode(_)) => GateDecision::Denied(DenyReason::Undecodable),
        Err(e) => GateDecision::Denied(DenyReason::Transport(e.to_string())),
    }
}

/// Probe the stored credential and clear the store unless access is granted.
pub async fn evaluate(client: &reqwest::Client, base_url: &str, store: &mut CredentialStore) -> GateDecision {
    let decision = match store.token() {
        None => GateDecision::Denied(DenyReason::NoCredentials),
        Some(token) => {
            let ctx = ApiContext::new(client.clone(), base_url, token);
            decide(current_user(&ctx).await)
        }
    };
    match &decision {
        GateDecision::Granted(user) => {
            store.recover();
            tracing::info!(email = %user.email, role = %user.role, "Session admitted");
        }
        GateDecision::Denied(reason) => {
            store.clear();
            tracing::warn!(%reason, "Session denied, credentials cleared");
        }
    }
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grants_only_admin_levels() {
        for role in [json!(40), json!("1000"), json!("Admin(40)")] {
            assert!(decide(Ok(json!({ "role": role }))).is_granted());
        }
        for role in [json!(10), json!(50), json!(0), json!(null), json!("Admin")] {
            assert!(!decide(Ok(json!({ "role": role }))).is_granted());
        }
        assert!(decide(Ok(json!({"data": {"role": 40}}))).is_granted());
    }

    #[test]
    fn failures_deny() {
        let denied = decide(Err(ApiError::Status { status: 401, body: Value::Null }));
        assert_eq!(denied, GateDecision::Denied(DenyReason::Rejected(401)));
        let denied = decide(Ok(json!("<html>login</html>")));
        assert_eq!(denied, GateDecision::Denied(DenyReason::Undecodable));
        let denied = decide(Err(ApiError::Transport("refused".into())));
        assert!(matches!(denied, GateDecision::Denied(DenyReason::Transport(_))));
    }

    #[tokio::test]
    async fn missing_token_clears_store() {
        let mut store = CredentialStore {
            auth_token: None,
            login_response: Some(json!({"user": "no token here"})),
        };
        let decision = evaluate(&reqwest::Client::new(), "http://127.0.0.1:9", &mut store).await;
        assert_eq!(decision, GateDecision::Denied(DenyReason::NoCredentials));
        assert!(store.is_empty());
    }
}
