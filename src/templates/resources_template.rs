use askama::Template;
use crate::models::{CurrentUser, EnvironmentResources};
use super::NavItem;

#[derive(Template)]
#[template(path = "resources.html")]
pub struct ResourcesTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub nav: Vec<NavItem>,
    pub title: String,
    pub status: String,
    pub meta: String,
    pub error: Option<String>,
    pub environments: Vec<EnvironmentResources>,
}
