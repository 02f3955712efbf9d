use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::api::ApiError;
use crate::utils::format_json;

/// Deployment environment with its own resource listing and installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Prod,
    Stage,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Prod, Environment::Stage];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" => Some(Environment::Prod),
            "stage" => Some(Environment::Stage),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Stage => "stage",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Environment::Prod => "Prod Env",
            Environment::Stage => "Stage Env",
        }
    }

    pub fn list_endpoint(self) -> &'static str {
        match self {
            Environment::Prod => "/resources/list/suite",
            Environment::Stage => "/resources/list/suite-stage",
        }
    }

    pub fn installer_endpoint(self) -> &'static str {
        match self {
            Environment::Prod => "/resources/get-installer",
            Environment::Stage => "/resources/get-installer/stage",
        }
    }
}

/// Result of listing one environment. A failure is kept alongside the
/// other environment's items rather than failing the whole overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResourceListing {
    Items(Vec<String>),
    Failed { message: String, body: Value },
}

impl ResourceListing {
    pub fn from_result(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(Value::Array(items)) => ResourceListing::Items(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Ok(_) => ResourceListing::Items(Vec::new()),
            Err(e) => ResourceListing::Failed {
                message: e.to_string(),
                body: e.body().cloned().unwrap_or(Value::Null),
            },
        }
    }

    pub fn items(&self) -> &[String] {
        match self {
            ResourceListing::Items(items) => items,
            ResourceListing::Failed { .. } => &[],
        }
    }

    /// Error panel text: the backend body when it sent one, else the message.
    pub fn error_text(&self) -> Option<String> {
        match self {
            ResourceListing::Items(_) => None,
            ResourceListing::Failed { message, body } if body.is_null() => Some(message.clone()),
            ResourceListing::Failed { body, .. } => Some(format_json(body)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnvironmentResources {
    pub env: Environment,
    pub listing: ResourceListing,
}

#[derive(Debug, Clone)]
pub struct ResourceOverview {
    pub environments: Vec<EnvironmentResources>,
    pub loaded_at: DateTime<Utc>,
}

impl ResourceOverview {
    pub fn loaded_at_display(&self) -> String {
        self.loaded_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    pub fn failures(&self) -> usize {
        self.environments
            .iter()
            .filter(|e| matches!(e.listing, ResourceListing::Failed { .. }))
            .count()
    }
}
