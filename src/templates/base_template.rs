use serde::Serialize;

/// One entry of the operations sidebar.
#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub key: &'static str,
    pub route: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub active: bool,
}
