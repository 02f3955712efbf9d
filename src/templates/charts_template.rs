use askama::Template;
use crate::models::CurrentUser;
use crate::services::charts::Chart;
use super::NavItem;

#[derive(Template)]
#[template(path = "charts.html")]
pub struct ChartsTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub nav: Vec<NavItem>,
    pub title: String,
    pub status: String,
    pub meta: String,
    pub error: Option<String>,
    pub user_count: usize,
    pub charts: Vec<Chart>,
    pub placeholder: &'static str,
}
