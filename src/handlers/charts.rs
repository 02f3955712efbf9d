use axum::{
    extract::State,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;

use crate::models::AppState;
use crate::services::charts::EMPTY_PLACEHOLDER;
use crate::services::operations::{OperationArgs, OperationKey};
use crate::templates::ChartsTemplate;

use super::helpers::{build_template_globals, render_template, run_operation_wrapper, TemplateGlobals};

pub async fn charts_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let view = run_operation_wrapper(&state, &jar, OperationKey::ShowChart, OperationArgs::None).await;
    let distribution = view.distribution();
    let user_count = view.users.as_ref().map(Vec::len).unwrap_or(0);
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
    } = build_template_globals(&state, &jar, Some(view.op));
    render_template(&state, &jar, ChartsTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
        title: view.title,
        status: view.status,
        meta: view.meta,
        error: view.error,
        user_count,
        charts: if user_count == 0 { Vec::new() } else { distribution.charts() },
        placeholder: EMPTY_PLACEHOLDER,
    })
}
