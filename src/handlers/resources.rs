use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::resources::open_installer;
use crate::models::{AppState, Environment};
use crate::services::operations::{OperationArgs, OperationKey};
use crate::templates::ResourcesTemplate;

use super::helpers::{build_template_globals, flash, render_template, run_operation_wrapper, session_context, TemplateGlobals};

pub async fn resources_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let view = run_operation_wrapper(&state, &jar, OperationKey::ListResources, OperationArgs::None).await;
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
    } = build_template_globals(&state, &jar, Some(view.op));
    render_template(&state, &jar, ResourcesTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
        title: view.title,
        status: view.status,
        meta: view.meta,
        error: view.error,
        environments: view.resources.map(|o| o.environments).unwrap_or_default(),
    })
}

/// Stream an installer from the backend to the browser.
pub async fn installer_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(env): Path<String>,
) -> Response {
    let Some(env) = Environment::from_str(&env) else {
        flash(&state, &jar, format!("Unknown environment: {}", env));
        return Redirect::to(OperationKey::ListResources.route()).into_response();
    };
    let Some(ctx) = session_context(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    match open_installer(&ctx, env).await {
        Ok((name, resp)) => {
            tracing::info!(env = env.as_str(), %name, "Installer download started");
            let content_type = resp
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("application/octet-stream")
                .to_string();
            let disposition = format!("attachment; filename=\"{}\"", name.replace('"', ""));
            (
                [(header::CONTENT_TYPE, content_type), (header::CONTENT_DISPOSITION, disposition)],
                Body::from_stream(resp.bytes_stream()),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(env = env.as_str(), error = %e, "Installer download failed");
            flash(&state, &jar, format!("Download failed: {}", e));
            Redirect::to(OperationKey::ListResources.route()).into_response()
        }
    }
}
