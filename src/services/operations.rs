//! The console's fixed set of operations and the view each one produces.
//!
//! [`run`] is the only place an operation talks to the backend. It always
//! returns a complete [`ConsoleView`]; nothing from an earlier run leaks
//! into it.

use chrono::Utc;
use serde::Serialize;

use crate::api::{self, ApiContext};
use crate::models::{operators_first, ResourceOverview, UserRecord};
use crate::services::charts::{distribution_from_raw, HardwareDistribution};
use crate::services::forms::{validate_clear, validate_upload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKey {
    ListUsers,
    ShowChart,
    CurrentUser,
    ListResources,
    UploadFile,
    ClearFolder,
}

impl OperationKey {
    pub const ALL: [OperationKey; 6] = [
        OperationKey::ListUsers,
        OperationKey::ShowChart,
        OperationKey::CurrentUser,
        OperationKey::ListResources,
        OperationKey::UploadFile,
        OperationKey::ClearFolder,
    ];

    pub fn key(self) -> &'static str {
        match self {
            OperationKey::ListUsers => "list-users",
            OperationKey::ShowChart => "show-chart",
            OperationKey::CurrentUser => "current-user",
            OperationKey::ListResources => "list-resources",
            OperationKey::UploadFile => "upload-file",
            OperationKey::ClearFolder => "clear-folder",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            OperationKey::ListUsers => "List Users",
            OperationKey::ShowChart => "Show Chart",
            OperationKey::CurrentUser => "Current User",
            OperationKey::ListResources => "List Resources",
            OperationKey::UploadFile => "Upload File",
            OperationKey::ClearFolder => "Clear Folder",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OperationKey::ListUsers => "Filter by email (optional)",
            OperationKey::ShowChart => "Pie charts by CPU / GPU / Memory",
            OperationKey::CurrentUser => "Get info about current user",
            OperationKey::ListResources => "List files in folder",
            OperationKey::UploadFile => "To specific folder",
            OperationKey::ClearFolder => "Remove all files",
        }
    }

    pub fn has_form(self) -> bool {
        matches!(self, OperationKey::UploadFile | OperationKey::ClearFolder)
    }

    pub fn output_title(self) -> &'static str {
        match self {
            OperationKey::ListUsers => "Users",
            OperationKey::ShowChart => "Users Hardware charts",
            OperationKey::CurrentUser => "Current User",
            OperationKey::ListResources => "Resources",
            OperationKey::UploadFile => "Upload File",
            OperationKey::ClearFolder => "Clear Folder",
        }
    }

    pub fn output_title_with(self, extra: Option<&str>) -> String {
        match extra.map(str::trim).filter(|e| !e.is_empty()) {
            Some(extra) => format!("{} — {}", self.output_title(), extra),
            None => self.output_title().to_string(),
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            OperationKey::ListUsers => "/users",
            OperationKey::ShowChart => "/charts",
            OperationKey::CurrentUser => "/current",
            OperationKey::ListResources => "/resources",
            OperationKey::UploadFile => "/upload",
            OperationKey::ClearFolder => "/clear",
        }
    }

    pub fn from_key(key: &str) -> Option<OperationKey> {
        OperationKey::ALL.into_iter().find(|op| op.key() == key)
    }

    /// Operation for a path; anything unknown lands on the user list.
    pub fn from_route(path: &str) -> OperationKey {
        let path = path.trim_end_matches('/');
        OperationKey::ALL
            .into_iter()
            .find(|op| op.route() == path)
            .unwrap_or(OperationKey::ListUsers)
    }
}

/// Inputs for a run. Operations ignore arguments that do not apply to them.
#[derive(Debug, Clone, Default)]
pub enum OperationArgs {
    #[default]
    None,
    Search(String),
    Upload {
        file_name: Option<String>,
        bytes: Vec<u8>,
        folder: String,
    },
    Clear {
        folder: String,
        confirmation: String,
    },
}

/// What the console shows after an operation.
#[derive(Debug, Clone)]
pub struct ConsoleView {
    pub op: OperationKey,
    pub title: String,
    pub status: String,
    pub meta: String,
    pub users: Option<Vec<UserRecord>>,
    pub resources: Option<ResourceOverview>,
    pub error: Option<String>,
}

impl ConsoleView {
    pub fn new(op: OperationKey) -> Self {
        ConsoleView {
            op,
            title: op.output_title().to_string(),
            status: String::new(),
            meta: String::new(),
            users: None,
            resources: None,
            error: None,
        }
    }

    fn failed(mut self, message: String) -> Self {
        self.status = message.clone();
        self.error = Some(message);
        self
    }

    /// Chart buckets for the users in this view.
    pub fn distribution(&self) -> HardwareDistribution {
        let users = self.users.as_deref().unwrap_or(&[]);
        distribution_from_raw(users.iter().map(|u| &u.hardware))
    }
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn load_users(view: ConsoleView, result: Result<Vec<UserRecord>, api::ApiError>) -> ConsoleView {
    match result {
        Ok(users) => ConsoleView {
            status: "OK".into(),
            users: Some(operators_first(users)),
            ..view
        },
        Err(e) => ConsoleView { users: Some(Vec::new()), ..view }.failed(e.to_string()),
    }
}

/// Perform `op` against the backend and build its view.
pub async fn run(op: OperationKey, ctx: &ApiContext, args: OperationArgs) -> ConsoleView {
    tracing::info!(op = op.key(), "Running operation");
    let view = ConsoleView::new(op);
    match op {
        OperationKey::ListUsers => {
            let search = match args {
                OperationArgs::Search(q) => q,
                _ => String::new(),
            };
            let title = op.output_title_with(Some(&search));
            let result = api::users::list_users(ctx, &search).await;
            load_users(ConsoleView { title, ..view }, result)
        }
        OperationKey::ShowChart => load_users(view, api::users::list_users(ctx, "").await),
        OperationKey::CurrentUser => load_users(view, api::users::current_account(ctx).await),
        OperationKey::ListResources => {
            let overview = api::resources::load_overview(ctx).await;
            ConsoleView {
                status: "OK".into(),
                meta: format!("{} — Resources loaded from both environments", overview.loaded_at_display()),
                resources: Some(overview),
                ..view
            }
        }
        OperationKey::UploadFile => match args {
            OperationArgs::Upload { file_name, bytes, folder } => {
                let folder = match validate_upload(file_name.as_deref(), &folder) {
                    Ok(f) => f,
                    Err(e) => return view.failed(e.to_string()),
                };
                let name = file_name.unwrap_or_default();
                match api::files::upload_bytes(ctx, &name, bytes, &folder).await {
                    Ok(_) => ConsoleView {
                        status: "File uploaded successfully!".into(),
                        meta: format!("{} — File \"{}\" uploaded to \"{}\" successfully!", timestamp(), name, folder),
                        ..view
                    },
                    Err(e) => view.failed(format!("Failed to upload file: {}", e)),
                }
            }
            _ => view,
        },
        OperationKey::ClearFolder => match args {
            OperationArgs::Clear { folder, confirmation } => {
                let folder = match validate_clear(&folder, &confirmation) {
                    Ok(f) => f,
                    Err(e) => return view.failed(e.to_string()),
                };
                match api::files::clear_folder(ctx, &folder).await {
                    Ok(_) => ConsoleView {
                        status: "Folder cleared successfully!".into(),
                        meta: format!("{} — Folder \"{}\" has been cleared successfully!", timestamp(), folder),
                        ..view
                    },
                    Err(e) => view.failed(format!("Failed to clear folder: {}", e)),
                }
            }
            _ => view,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_metadata() {
        assert_eq!(OperationKey::ShowChart.output_title(), "Users Hardware charts");
        assert!(OperationKey::ClearFolder.has_form());
        assert!(!OperationKey::ListResources.has_form());
        assert_eq!(OperationKey::from_key("current-user"), Some(OperationKey::CurrentUser));
        assert_eq!(OperationKey::from_key("nope"), None);
    }

    #[test]
    fn unknown_routes_fall_back_to_user_list() {
        assert_eq!(OperationKey::from_route("/charts"), OperationKey::ShowChart);
        assert_eq!(OperationKey::from_route("/resources/"), OperationKey::ListResources);
        assert_eq!(OperationKey::from_route("/whatever"), OperationKey::ListUsers);
    }

    #[test]
    fn title_suffix() {
        assert_eq!(OperationKey::ListUsers.output_title_with(Some("bob")), "Users — bob");
        assert_eq!(OperationKey::ListUsers.output_title_with(Some("  ")), "Users");
    }

    #[tokio::test]
    async fn form_errors_short_circuit_before_network() {
        let ctx = ApiContext::new(reqwest::Client::new(), "http://127.0.0.1:9", "t");
        let args = OperationArgs::Clear { folder: "/x".into(), confirmation: "clear".into() };
        let view = run(OperationKey::ClearFolder, &ctx, args).await;
        assert_eq!(view.status, "Please type \"CLEAR\" to confirm");
        assert_eq!(view.title, "Clear Folder");

        let args = OperationArgs::Upload { file_name: None, bytes: vec![], folder: "/x".into() };
        let view = run(OperationKey::UploadFile, &ctx, args).await;
        assert_eq!(view.status, "Please select a file to upload");
    }
}
