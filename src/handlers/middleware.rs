use axum::{
    extract::{State, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::models::AppState;
use crate::handlers::helpers::ensure_logged_in;

/// Pages behind the gate need a stored token and an admitted account.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    match ensure_logged_in(&state, &jar) {
        None => next.run(request).await,
        Some(redirect) => redirect.into_response(),
    }
}
