use azadmin::config;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

// Tests touching process env vars must not interleave.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn test_sanitize_base_url_removes_trailing_slash() {
    assert_eq!(config::sanitize_base_url("https://api.azaion.com/"), "https://api.azaion.com");
}

#[test]
fn test_sanitize_base_url_multiple_trailing_slashes() {
    assert_eq!(config::sanitize_base_url("https://api.azaion.com///"), "https://api.azaion.com");
}

#[test]
fn test_sanitize_base_url_with_whitespace() {
    assert_eq!(config::sanitize_base_url("  http://localhost:5000/  "), "http://localhost:5000");
}

#[test]
fn test_sanitize_base_url_empty_string() {
    assert_eq!(config::sanitize_base_url(""), config::DEFAULT_API_BASE_URL);
    assert_eq!(config::sanitize_base_url("   "), config::DEFAULT_API_BASE_URL);
}

#[test]
fn test_get_api_base_url_with_trailing_slash() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("API_BASE_URL", "https://stage.azaion.com/");

    assert_eq!(config::get_api_base_url(), "https://stage.azaion.com");

    env::remove_var("API_BASE_URL");
}

#[test]
fn test_get_api_base_url_uses_default() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("API_BASE_URL");

    assert_eq!(config::get_api_base_url(), "https://api.azaion.com");
}

#[test]
fn test_credentials_path_override() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("AZADMIN_CREDENTIALS");
    assert_eq!(config::get_credentials_path(), PathBuf::from(".azadmin-credentials.json"));

    env::set_var("AZADMIN_CREDENTIALS", " /tmp/azadmin.json ");
    assert_eq!(config::get_credentials_path(), PathBuf::from("/tmp/azadmin.json"));

    env::set_var("AZADMIN_CREDENTIALS", "  ");
    assert_eq!(config::get_credentials_path(), PathBuf::from(".azadmin-credentials.json"));
    env::remove_var("AZADMIN_CREDENTIALS");
}

#[test]
fn test_download_dir_default() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("AZADMIN_DOWNLOAD_DIR");
    assert_eq!(config::get_download_dir(), PathBuf::from("."));
}

#[test]
fn test_search_debounce_is_700ms() {
    assert_eq!(config::SEARCH_DEBOUNCE.as_millis(), 700);
}
