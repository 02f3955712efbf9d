// Transport
pub mod client;
pub mod error;

// Backend resources
pub mod auth;
pub mod files;
pub mod resources;
pub mod users;

pub use client::{api_call, api_call_multipart, api_get_raw, bearer_header, decode_body, set_silent, ApiContext};
pub use error::ApiError;
