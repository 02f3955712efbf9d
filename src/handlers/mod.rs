pub mod auth;
pub mod helpers;
pub mod middleware;
pub mod system;

// Console pages
pub mod users;
pub mod charts;
pub mod resources;
pub mod files;
