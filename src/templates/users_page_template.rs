use askama::Template;
use crate::models::{CurrentUser, UserCard};
use super::NavItem;

#[derive(Debug, Clone)]
pub struct RoleOption {
    pub value: i64,
    pub text: String,
    pub selected: bool,
}

/// User list, shared by the list and current-user operations.
#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersPageTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub nav: Vec<NavItem>,
    pub title: String,
    pub status: String,
    pub meta: String,
    pub error: Option<String>,
    pub show_search: bool,
    pub search: String,
    pub cards: Vec<UserCard>,
    pub role_options: Vec<RoleOption>,
}
