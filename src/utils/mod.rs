// URL handling utilities
pub mod url_parser;
pub mod query_string;
pub mod content_disposition;

// Formatting utilities
pub mod json_converter;
pub mod last_login;
pub mod table;

pub use url_parser::{hostname_from_url, path_segment};
pub use query_string::{build_query_string, search_params};
pub use content_disposition::filename_from_content_disposition;
pub use json_converter::{format_json, is_truthy, value_to_short_string};
pub use last_login::{format_utc_date, last_login_display};
pub use table::new_table;
