use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use super::client::{api_call, api_call_multipart};
use super::{ApiContext, ApiError};

/// `POST /upload` with a `file` part and the target `folderPath`.
pub async fn upload_bytes(
    ctx: &ApiContext,
    file_name: &str,
    bytes: Vec<u8>,
    folder: &str,
) -> Result<Value, ApiError> {
    let form = Form::new()
        .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
        .text("folderPath", folder.to_string());
    api_call_multipart(ctx, "/upload", form).await
}

/// Upload a local file, keeping its base name.
pub async fn upload_path(ctx: &ApiContext, path: &Path, folder: &str) -> Result<Value, ApiError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string());
    upload_bytes(ctx, &file_name, bytes, folder).await
}

/// `POST /clear-folder`; removes every file in the folder.
pub async fn clear_folder(ctx: &ApiContext, folder: &str) -> Result<Value, ApiError> {
    api_call(ctx, "POST", "/clear-folder", Some(json!({ "folderPath": folder })), None).await
}
