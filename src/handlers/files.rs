use axum::{
    extract::{Form, Multipart, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::models::AppState;
use crate::services::forms::CLEAR_CONFIRMATION;
use crate::services::operations::{ConsoleView, OperationArgs, OperationKey};
use crate::templates::{ClearFolderTemplate, UploadTemplate};

use super::helpers::{build_template_globals, render_template, run_operation_wrapper, TemplateGlobals};

fn upload_page(state: &AppState, jar: &CookieJar, view: ConsoleView, folder: String) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
    } = build_template_globals(state, jar, Some(view.op));
    render_template(state, jar, UploadTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
        title: view.title,
        status: view.status,
        meta: view.meta,
        error: view.error,
        folder,
    })
}

fn clear_page(state: &AppState, jar: &CookieJar, view: ConsoleView, folder: String) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
    } = build_template_globals(state, jar, Some(view.op));
    render_template(state, jar, ClearFolderTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        nav,
        title: view.title,
        status: view.status,
        meta: view.meta,
        error: view.error,
        folder,
        confirmation_word: CLEAR_CONFIRMATION,
    })
}

pub async fn upload_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    upload_page(&state, &jar, ConsoleView::new(OperationKey::UploadFile), String::new())
}

pub async fn upload_post(State(state): State<AppState>, jar: CookieJar, mut multipart: Multipart) -> Response {
    let mut file_name = None;
    let mut bytes = Vec::new();
    let mut folder = String::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed upload form");
                let mut view = ConsoleView::new(OperationKey::UploadFile);
                view.status = format!("Failed to upload file: {}", e);
                return upload_page(&state, &jar, view, folder);
            }
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().map(str::to_string).filter(|n| !n.is_empty());
                match field.bytes().await {
                    Ok(b) => bytes = b.to_vec(),
                    Err(e) => {
                        let mut view = ConsoleView::new(OperationKey::UploadFile);
                        view.status = format!("Failed to upload file: {}", e);
                        return upload_page(&state, &jar, view, folder);
                    }
                }
            }
            Some("folderPath") => folder = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }
    let args = OperationArgs::Upload { file_name, bytes, folder: folder.clone() };
    let view = run_operation_wrapper(&state, &jar, OperationKey::UploadFile, args).await;
    upload_page(&state, &jar, view, folder)
}

#[derive(Deserialize)]
pub struct ClearFolderForm {
    #[serde(rename = "folderPath", default)]
    pub folder_path: String,
    #[serde(default)]
    pub confirm: String,
}

pub async fn clear_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    clear_page(&state, &jar, ConsoleView::new(OperationKey::ClearFolder), String::new())
}

pub async fn clear_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ClearFolderForm>,
) -> impl IntoResponse {
    let args = OperationArgs::Clear { folder: form.folder_path.clone(), confirmation: form.confirm };
    let view = run_operation_wrapper(&state, &jar, OperationKey::ClearFolder, args).await;
    clear_page(&state, &jar, view, form.folder_path)
}
