use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys a login response may carry the bearer token under, in lookup order.
/// `data.token` is the nested envelope some backends return.
const TOKEN_PATHS: [&[&str]; 8] = [
    &["token"],
    &["data", "token"],
    &["accessToken"],
    &["access_token"],
    &["jwt"],
    &["authToken"],
    &["Authorization"],
    &["authorization"],
];

/// Pull a non-empty bearer token out of a login response.
pub fn extract_token(response: &Value) -> Option<String> {
    TOKEN_PATHS.iter().find_map(|path| {
        let mut node = response;
        for key in path.iter() {
            node = node.get(*key)?;
        }
        node.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// The two-key credential store: bearer token and the raw login response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialStore {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(rename = "loginResponse", default, skip_serializing_if = "Option::is_none")]
    pub login_response: Option<Value>,
}

impl CredentialStore {
    /// Store a successful login. Returns `false` when the response holds no
    /// token, in which case the store is left cleared.
    pub fn store_login(&mut self, response: Value) -> bool {
        match extract_token(&response) {
            Some(token) => {
                self.auth_token = Some(token);
                self.login_response = Some(response);
                true
            }
            None => {
                self.clear();
                false
            }
        }
    }

    /// Bearer token, recovered from the saved login response when the token
    /// key itself is missing.
    pub fn token(&self) -> Option<String> {
        self.auth_token
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.login_response.as_ref().and_then(extract_token))
    }

    /// Fill in `authToken` from the login response if it went missing.
    /// Returns whether a token is available afterwards.
    pub fn recover(&mut self) -> bool {
        match self.token() {
            Some(token) => {
                self.auth_token = Some(token);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.auth_token = None;
        self.login_response = None;
    }

    pub fn is_empty(&self) -> bool {
        self.auth_token.is_none() && self.login_response.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_lookup_order() {
        assert_eq!(extract_token(&json!({"token": "a", "jwt": "b"})).as_deref(), Some("a"));
        assert_eq!(extract_token(&json!({"data": {"token": "n"}})).as_deref(), Some("n"));
        assert_eq!(extract_token(&json!({"token": "", "access_token": "c"})).as_deref(), Some("c"));
        assert_eq!(extract_token(&json!({"authorization": "Bearer z"})).as_deref(), Some("Bearer z"));
        assert_eq!(extract_token(&json!({"user": {}})), None);
        assert_eq!(extract_token(&json!("raw")), None);
    }

    #[test]
    fn recovers_token_from_login_response() {
        let mut store = CredentialStore {
            auth_token: None,
            login_response: Some(json!({"accessToken": "xyz"})),
        };
        assert!(store.recover());
        assert_eq!(store.auth_token.as_deref(), Some("xyz"));
    }

    #[test]
    fn store_login_without_token_leaves_store_empty() {
        let mut store = CredentialStore { auth_token: Some("old".into()), login_response: None };
        assert!(!store.store_login(json!({"ok": true})));
        assert!(store.is_empty());
    }

    #[test]
    fn serializes_with_store_key_names() {
        let mut store = CredentialStore::default();
        store.store_login(json!({"token": "t"}));
        let text = serde_json::to_string(&store).unwrap();
        assert!(text.contains("\"authToken\":\"t\""));
        assert!(text.contains("\"loginResponse\""));
    }
}
