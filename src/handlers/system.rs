use axum::{
    extract::{Path, State},
    http::{header, Uri},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;

use crate::models::{AppState, ConfirmationAction};
use crate::services::operations::OperationKey;
use crate::templates::ConfirmationTemplate;
use crate::utils::path_segment;

use super::helpers::{build_template_globals, render_template, TemplateGlobals};

/// Stylesheet shipped inside the binary; `serve --stylesheet` overrides it.
pub const DEFAULT_STYLESHEET: &str = include_str!("../../static/styles.css");

pub async fn confirmation_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((action, email)): Path<(String, String)>,
) -> impl IntoResponse {
    let Some(action) = ConfirmationAction::from_str(&action) else {
        return Redirect::to(OperationKey::ListUsers.route()).into_response();
    };
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
    } = build_template_globals(&state, &jar, Some(OperationKey::ListUsers));
    render_template(&state, &jar, ConfirmationTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
        title: action.title().to_string(),
        message: action.prompt(&email),
        target_url: action.action_path(&path_segment(&email)),
        confirm_label: action.title().to_string(),
        cancel_url: OperationKey::ListUsers.route().to_string(),
        button_class: match action {
            ConfirmationAction::DisableUser => "btn-warning".to_string(),
            _ => "btn-danger".to_string(),
        },
    })
    .into_response()
}

pub async fn stylesheet_get(State(state): State<AppState>) -> impl IntoResponse {
    let css = state.custom_css.clone().unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());
    ([(header::CONTENT_TYPE, "text/css")], css)
}

/// Unknown paths land on the operation they resolve to.
pub async fn fallback(uri: Uri) -> impl IntoResponse {
    Redirect::to(OperationKey::from_route(uri.path()).route())
}
