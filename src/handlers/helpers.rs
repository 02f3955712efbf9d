use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::api::ApiContext;
use crate::config::SEARCH_DEBOUNCE;
use crate::models::app_state::SESSION_TTL;
use crate::models::{AppState, CurrentUser, Session};
use crate::services::operations::{self, ConsoleView, OperationArgs, OperationKey};
use crate::services::random_session_id;
use crate::templates::NavItem;

pub const SESSION_COOKIE: &str = "session_id";
pub const SESSION_MAX_AGE: time::Duration = time::Duration::seconds(SESSION_TTL.as_secs() as i64);

pub fn session_id_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Existing session id, or a fresh one added to the jar.
pub fn ensure_session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(sid) = session_id_from_jar(&jar) {
        return (jar, sid);
    }
    let sid = random_session_id();
    let mut cookie = Cookie::new(SESSION_COOKIE, sid.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_max_age(SESSION_MAX_AGE);
    (jar.add(cookie), sid)
}

pub fn current_session(state: &AppState, jar: &CookieJar) -> Option<Session> {
    let sid = session_id_from_jar(jar)?;
    state.session(&sid)
}

/// The account the gate admitted for this browser, if any.
pub fn current_user_from_jar(state: &AppState, jar: &CookieJar) -> Option<CurrentUser> {
    current_session(state, jar).and_then(|s| s.user)
}

/// Backend context carrying this session's bearer token.
pub fn session_context(state: &AppState, jar: &CookieJar) -> Option<ApiContext> {
    let token = current_session(state, jar)?.credentials.token()?;
    Some(state.api_context(&token))
}

pub fn take_flash_messages(state: &AppState, jar: &CookieJar) -> Vec<String> {
    let Some(sid) = session_id_from_jar(jar) else {
        return vec![];
    };
    let mut fs = state.flash_store.lock().unwrap();
    fs.remove(&sid).unwrap_or_default()
}

pub fn flash(state: &AppState, jar: &CookieJar, message: impl Into<String>) {
    if let Some(sid) = session_id_from_jar(jar) {
        state.push_flash(&sid, message);
    }
}

pub fn nav_items(active: Option<OperationKey>) -> Vec<NavItem> {
    OperationKey::ALL
        .into_iter()
        .map(|op| NavItem {
            key: op.key(),
            route: op.route(),
            title: op.title(),
            description: op.description(),
            active: Some(op) == active,
        })
        .collect()
}

#[derive(Default)]
pub struct TemplateGlobals {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub nav: Vec<NavItem>,
}

pub fn build_template_globals(state: &AppState, jar: &CookieJar, active: Option<OperationKey>) -> TemplateGlobals {
    let flash_messages = take_flash_messages(state, jar);
    let has_flash_messages = !flash_messages.is_empty();
    TemplateGlobals {
        current_user: current_user_from_jar(state, jar),
        api_hostname: crate::utils::hostname_from_url(&state.api_base_url),
        flash_messages,
        has_flash_messages,
        nav: nav_items(active),
    }
}

/// Expose a small context object to page scripts (the search box reads the
/// debounce delay from it).
pub fn inject_context(state: &AppState, jar: &CookieJar, html: String) -> Response {
    let context = serde_json::json!({
        "apiHostname": crate::utils::hostname_from_url(&state.api_base_url),
        "currentUser": current_user_from_jar(state, jar),
        "searchDebounceMs": SEARCH_DEBOUNCE.as_millis() as u64,
    });
    let context_str = serde_json::to_string(&context).unwrap_or_else(|_| "{}".into());
    Html(with_context_script(html, &context_str)).into_response()
}

/// Place the context script in `<head>` so it is defined before any page
/// script in the body runs. Pages without a head get it before `</body>`.
fn with_context_script(html: String, context_json: &str) -> String {
    let script = format!("<script>window.__APP_CONTEXT__ = {};</script>", context_json);
    for anchor in ["</head>", "</body>"] {
        if let Some(at) = html.find(anchor) {
            let mut out = html;
            out.insert_str(at, &script);
            return out;
        }
    }
    html
}

pub fn render_template<T: askama::Template>(state: &AppState, jar: &CookieJar, t: T) -> Response {
    match t.render() {
        Ok(body) => inject_context(state, jar, body),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub fn ensure_logged_in(state: &AppState, jar: &CookieJar) -> Option<Redirect> {
    if session_context(state, jar).is_none() || current_user_from_jar(state, jar).is_none() {
        return Some(Redirect::to("/login"));
    }
    None
}

/// Run a console operation with this session's credentials, logging the
/// boundary the same way for every page.
pub async fn run_operation_wrapper(
    state: &AppState,
    jar: &CookieJar,
    op: OperationKey,
    args: OperationArgs,
) -> ConsoleView {
    let Some(ctx) = session_context(state, jar) else {
        let mut view = ConsoleView::new(op);
        view.status = "Not logged in".into();
        return view;
    };
    tracing::info!(op = op.key(), "Console request");
    let view = operations::run(op, &ctx, args).await;
    tracing::info!(op = op.key(), status = %view.status, "Console response");
    view
}
