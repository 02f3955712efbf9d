use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::{self, ApiError};
use crate::models::{AppState, RoleCode, UserCard};
use crate::services::forms::{parse_role_choice, validate_new_user};
use crate::services::operations::{ConsoleView, OperationArgs, OperationKey};
use crate::templates::{RoleOption, UsersPageTemplate};

use super::helpers::{build_template_globals, flash, render_template, run_operation_wrapper, session_context, TemplateGlobals};

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

pub fn role_options(selected: Option<RoleCode>) -> Vec<RoleOption> {
    RoleCode::ALL
        .into_iter()
        .filter(|r| *r != RoleCode::NONE)
        .map(|r| RoleOption {
            value: r.code(),
            text: format!("{} ({})", r.code(), r.label().text),
            selected: Some(r) == selected,
        })
        .collect()
}

fn users_page(state: &AppState, jar: &CookieJar, view: ConsoleView, search: String) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
    } = build_template_globals(state, jar, Some(view.op));
    let cards: Vec<UserCard> = view.users.as_deref().unwrap_or(&[]).iter().map(UserCard::from_record).collect();
    render_template(state, jar, UsersPageTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
        show_search: view.op == OperationKey::ListUsers,
        title: view.title,
        status: view.status,
        meta: view.meta,
        error: view.error,
        search,
        cards,
        role_options: role_options(None),
    })
}

pub async fn users_list(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search = query.search.trim().to_string();
    let view = run_operation_wrapper(&state, &jar, OperationKey::ListUsers, OperationArgs::Search(search.clone())).await;
    users_page(&state, &jar, view, search)
}

pub async fn current_user_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let view = run_operation_wrapper(&state, &jar, OperationKey::CurrentUser, OperationArgs::None).await;
    users_page(&state, &jar, view, String::new())
}

#[derive(Deserialize)]
pub struct CreateUserForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
}

/// Flash the outcome of a mutation and go back to the list, which re-fetches.
fn after_mutation(state: &AppState, jar: &CookieJar, result: Result<String, String>) -> Response {
    flash(state, jar, result.unwrap_or_else(|e| e));
    Redirect::to(OperationKey::ListUsers.route()).into_response()
}

fn failure(prefix: &str, e: ApiError) -> String {
    format!("{}: {}", prefix, e.detail())
}

pub async fn users_create(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CreateUserForm>,
) -> Response {
    let Some(ctx) = session_context(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let result = match validate_new_user(&form.email, &form.password, &form.role) {
        Err(e) => Err(e.to_string()),
        Ok(new_user) => api::users::create_user(&ctx, &new_user.email, &new_user.password, new_user.role)
            .await
            .map(|_| {
                tracing::info!(email = %new_user.email, role = %new_user.role, "User created");
                "User created successfully!".to_string()
            })
            .map_err(|e| failure("Failed to create user", e)),
    };
    after_mutation(&state, &jar, result)
}

pub async fn user_enable(State(state): State<AppState>, jar: CookieJar, Path(email): Path<String>) -> Response {
    toggle(state, jar, email, true).await
}

pub async fn user_disable(State(state): State<AppState>, jar: CookieJar, Path(email): Path<String>) -> Response {
    toggle(state, jar, email, false).await
}

async fn toggle(state: AppState, jar: CookieJar, email: String, enabled: bool) -> Response {
    let Some(ctx) = session_context(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let verb = if enabled { "enable" } else { "disable" };
    let result = api::users::set_enabled(&ctx, &email, enabled)
        .await
        .map(|_| {
            tracing::info!(%email, enabled, "User status changed");
            format!("User {}d: {}", verb, email)
        })
        .map_err(|e| failure(&format!("Failed to {} user", verb), e));
    after_mutation(&state, &jar, result)
}

pub async fn user_delete(State(state): State<AppState>, jar: CookieJar, Path(email): Path<String>) -> Response {
    let Some(ctx) = session_context(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let result = api::users::delete_user(&ctx, &email)
        .await
        .map(|_| {
            tracing::info!(%email, "User deleted");
            format!("User deleted: {}", email)
        })
        .map_err(|e| failure("Failed to delete user", e));
    after_mutation(&state, &jar, result)
}

pub async fn user_reset_hardware(State(state): State<AppState>, jar: CookieJar, Path(email): Path<String>) -> Response {
    let Some(ctx) = session_context(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let result = api::users::reset_hardware(&ctx, &email)
        .await
        .map(|_| {
            tracing::info!(%email, "Hardware reset");
            format!("Hardware reset for {}", email)
        })
        .map_err(|e| failure("Failed to reset hardware", e));
    after_mutation(&state, &jar, result)
}

#[derive(Deserialize)]
pub struct RoleForm {
    pub role: String,
}

pub async fn user_set_role(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(email): Path<String>,
    Form(form): Form<RoleForm>,
) -> Response {
    let Some(ctx) = session_context(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let result = match parse_role_choice(&form.role) {
        Err(e) => Err(e.to_string()),
        Ok(role) if role == RoleCode::NONE => Err("Please choose a role".to_string()),
        Ok(role) => api::users::set_role(&ctx, &email, role)
            .await
            .map(|_| {
                tracing::info!(%email, %role, "Role changed");
                format!("Role of {} set to {}", email, role.label().text)
            })
            .map_err(|e| failure("Failed to update role", e)),
    };
    after_mutation(&state, &jar, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_choices_skip_none() {
        let options = role_options(Some(RoleCode::ADMIN));
        assert_eq!(options.len(), 6);
        assert_eq!(options[0].text, "10 (Operator)");
        assert!(options.iter().find(|o| o.value == 40).unwrap().selected);
        assert_eq!(options.last().unwrap().text, "1000 (ApiAdmin)");
    }
}
