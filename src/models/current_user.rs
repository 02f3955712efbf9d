use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::RoleCode;
use crate::utils::value_to_short_string;

/// The signed-in account as reported by `/currentuser`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    pub email: String,
    pub role: RoleCode,
}

impl CurrentUser {
    /// Role from `role`, falling back to the `data.role` envelope.
    pub fn role_of(payload: &Value) -> RoleCode {
        match payload.get("role") {
            Some(role) => RoleCode::from_value(role),
            None => payload
                .get("data")
                .and_then(|d| d.get("role"))
                .map(RoleCode::from_value)
                .unwrap_or_default(),
        }
    }

    pub fn from_payload(payload: &Value) -> CurrentUser {
        let email = payload
            .get("email")
            .or_else(|| payload.get("data").and_then(|d| d.get("email")))
            .map(value_to_short_string)
            .unwrap_or_default();
        CurrentUser { email, role: CurrentUser::role_of(payload) }
    }

    pub fn role_text(&self) -> String {
        self.role.label().text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_nested_envelope() {
        let user = CurrentUser::from_payload(&json!({"data": {"email": "a@b", "role": "40"}}));
        assert_eq!(user.email, "a@b");
        assert_eq!(user.role, RoleCode::ADMIN);
        assert_eq!(user.role_text(), "Admin");
    }

    #[test]
    fn top_level_role_wins() {
        let payload = json!({"role": 1000, "data": {"role": 10}});
        assert_eq!(CurrentUser::role_of(&payload), RoleCode::API_ADMIN);
        assert_eq!(CurrentUser::role_of(&json!({})), RoleCode::NONE);
    }
}
