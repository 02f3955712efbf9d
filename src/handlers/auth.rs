use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::api::auth::{login, login_failure_message};
use crate::models::AppState;
use crate::services::forms::FormError;
use crate::services::operations::OperationKey;
use crate::services::session_gate::{self, GateDecision};
use crate::templates::LoginTemplate;

use super::helpers::{
    build_template_globals, current_session, current_user_from_jar, ensure_session_id, flash, render_template,
    session_id_from_jar, TemplateGlobals, SESSION_COOKIE,
};

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn login_page(state: &AppState, jar: &CookieJar, email: &str, error: Option<String>) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
    } = build_template_globals(state, jar, None);
    render_template(state, jar, LoginTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
        email: email.to_string(),
        error,
    })
}

/// Run the gate on this session's stored credentials and record the outcome.
async fn admit(state: &AppState, sid: &str) -> GateDecision {
    let mut credentials = state.session(sid).map(|s| s.credentials).unwrap_or_default();
    let decision = session_gate::evaluate(&state.client, &state.api_base_url, &mut credentials).await;
    state.update_session(sid, |session| {
        session.credentials = credentials;
        session.user = match &decision {
            GateDecision::Granted(user) => Some(user.clone()),
            GateDecision::Denied(_) => None,
        };
    });
    decision
}

pub async fn login_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if current_user_from_jar(&state, &jar).is_some() {
        return Redirect::to("/").into_response();
    }
    login_page(&state, &jar, "", None)
}

pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    let email = form.email.trim().to_string();
    if email.is_empty() || form.password.is_empty() {
        return login_page(&state, &jar, &email, Some(FormError::MissingCredentials.to_string()));
    }

    let (jar, sid) = ensure_session_id(jar);
    let ctx = state.api_context("");
    let response = match login(&ctx, &email, &form.password).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(%email, error = %e, "Login failed");
            let page = login_page(&state, &jar, &email, Some(login_failure_message(&e)));
            return (jar, page).into_response();
        }
    };

    let mut has_token = false;
    state.update_session(&sid, |session| {
        has_token = session.credentials.store_login(response);
    });
    if !has_token {
        let page = login_page(&state, &jar, &email, Some("Login response did not contain a token".into()));
        return (jar, page).into_response();
    }

    match admit(&state, &sid).await {
        GateDecision::Granted(_) => (jar, Redirect::to(OperationKey::ListUsers.route())).into_response(),
        GateDecision::Denied(reason) => {
            let page = login_page(&state, &jar, &email, Some(reason.to_string()));
            (jar, page).into_response()
        }
    }
}

pub async fn logout_post(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(sid) = session_id_from_jar(&jar) {
        state.drop_session(&sid);
    }
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    let cleared = jar.remove(cookie);
    (cleared, Redirect::to("/login")).into_response()
}

/// Application load: re-check the stored credential before showing anything.
pub async fn root_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let Some(sid) = session_id_from_jar(&jar) else {
        return Redirect::to("/login").into_response();
    };
    if current_session(&state, &jar).map(|s| s.credentials.is_empty()).unwrap_or(true) {
        return Redirect::to("/login").into_response();
    }
    match admit(&state, &sid).await {
        GateDecision::Granted(_) => Redirect::to(OperationKey::ListUsers.route()).into_response(),
        GateDecision::Denied(reason) => {
            flash(&state, &jar, reason.to_string());
            Redirect::to("/login").into_response()
        }
    }
}
