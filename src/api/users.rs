use serde_json::json;

use crate::models::{users_from_value, RoleCode, UserRecord};
use crate::utils::{path_segment, search_params};

use super::client::api_call;
use super::{ApiContext, ApiError};

/// `GET /users`, optionally filtered by `searchEmail`.
pub async fn list_users(ctx: &ApiContext, search_email: &str) -> Result<Vec<UserRecord>, ApiError> {
    let payload = api_call(ctx, "GET", "/users", None, search_params(search_email)).await?;
    Ok(users_from_value(&payload))
}

/// `GET /users/current`: the signed-in account as a full user record.
pub async fn current_account(ctx: &ApiContext) -> Result<Vec<UserRecord>, ApiError> {
    let payload = api_call(ctx, "GET", "/users/current", None, None).await?;
    Ok(users_from_value(&payload))
}

pub async fn set_enabled(ctx: &ApiContext, email: &str, enabled: bool) -> Result<(), ApiError> {
    let action = if enabled { "enable" } else { "disable" };
    let endpoint = format!("/users/{}/{}", path_segment(email), action);
    api_call(ctx, "PUT", &endpoint, None, None).await.map(|_| ())
}

pub async fn delete_user(ctx: &ApiContext, email: &str) -> Result<(), ApiError> {
    let endpoint = format!("/users/{}", path_segment(email));
    api_call(ctx, "DELETE", &endpoint, None, None).await.map(|_| ())
}

/// Drop the stored hardware binding so the user can sign in from a new machine.
pub async fn reset_hardware(ctx: &ApiContext, email: &str) -> Result<(), ApiError> {
    let endpoint = format!("/users/{}/hardware", path_segment(email));
    api_call(ctx, "DELETE", &endpoint, None, None).await.map(|_| ())
}

pub async fn set_role(ctx: &ApiContext, email: &str, role: RoleCode) -> Result<(), ApiError> {
    let endpoint = format!("/users/{}/set-role/{}", path_segment(email), role.code());
    api_call(ctx, "PUT", &endpoint, None, None).await.map(|_| ())
}

pub async fn create_user(
    ctx: &ApiContext,
    email: &str,
    password: &str,
    role: RoleCode,
) -> Result<serde_json::Value, ApiError> {
    let body = json!({ "email": email, "password": password, "role": role.code() });
    api_call(ctx, "POST", "/users", Some(body), None).await
}

/// Re-read one user after a mutation. `None` when the search no longer
/// finds an exact match (for example after a delete).
pub async fn refresh_user(ctx: &ApiContext, email: &str) -> Result<Option<UserRecord>, ApiError> {
    let users = list_users(ctx, email).await?;
    Ok(users.into_iter().find(|u| u.email.eq_ignore_ascii_case(email)))
}
