use askama::Template;
use crate::models::CurrentUser;
use super::NavItem;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub nav: Vec<NavItem>,
    pub email: String,
    pub error: Option<String>,
}
