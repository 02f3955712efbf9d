//! Deployment resources: per-environment listings and installer downloads.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};

use crate::models::{Environment, EnvironmentResources, ResourceListing, ResourceOverview};
use crate::utils::filename_from_content_disposition;

use super::client::{api_call, api_get_raw};
use super::{ApiContext, ApiError};

pub async fn list_environment(ctx: &ApiContext, env: Environment) -> ResourceListing {
    ResourceListing::from_result(api_call(ctx, "GET", env.list_endpoint(), None, None).await)
}

/// Both environments fetched concurrently; a failure in one is recorded in
/// its listing and does not affect the other.
pub async fn load_overview(ctx: &ApiContext) -> ResourceOverview {
    let (prod, stage) = tokio::join!(
        list_environment(ctx, Environment::Prod),
        list_environment(ctx, Environment::Stage),
    );
    ResourceOverview {
        environments: vec![
            EnvironmentResources { env: Environment::Prod, listing: prod },
            EnvironmentResources { env: Environment::Stage, listing: stage },
        ],
        loaded_at: Utc::now(),
    }
}

/// Name used when the backend sends no `Content-Disposition`.
pub fn fallback_installer_name(env: Environment) -> String {
    format!("installer-{}", env.as_str())
}

/// Open the installer stream. Returns the suggested file name alongside
/// the response so the body can be streamed to a file or a browser.
pub async fn open_installer(
    ctx: &ApiContext,
    env: Environment,
) -> Result<(String, reqwest::Response), ApiError> {
    let resp = api_get_raw(ctx, env.installer_endpoint()).await?;
    let name = resp
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(filename_from_content_disposition)
        .unwrap_or_else(|| fallback_installer_name(env));
    Ok((name, resp))
}

fn progress_bar(total: Option<u64>, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    match total {
        Some(size) => {
            let pb = ProgressBar::new(size);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} Downloaded {bytes}") {
                pb.set_style(style);
            }
            pb
        }
    }
}

/// Download an installer into `dir`. The body goes to a temporary file in
/// the same directory and is renamed into place only once complete.
pub async fn download_installer(
    ctx: &ApiContext,
    env: Environment,
    dir: &Path,
    show_progress: bool,
) -> Result<PathBuf, ApiError> {
    let (name, resp) = open_installer(ctx, env).await?;
    tokio::fs::create_dir_all(dir).await?;
    let dest = dir.join(&name);
    tracing::info!(env = env.as_str(), dest = %dest.display(), "Downloading installer");

    let pb = progress_bar(resp.content_length(), show_progress);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    let mut downloaded = 0u64;
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        tmp.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }
    tmp.as_file().sync_all()?;
    pb.finish_with_message("Download complete");

    tmp.persist(&dest).map_err(|e| ApiError::Io(e.error.to_string()))?;
    tracing::info!("Downloaded {} bytes to {:?}", downloaded, dest);
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_names_carry_environment() {
        assert_eq!(fallback_installer_name(Environment::Prod), "installer-prod");
        assert_eq!(fallback_installer_name(Environment::Stage), "installer-stage");
    }
}
