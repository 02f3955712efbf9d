//! Local validation of the console's input forms, run before any backend call.

use thiserror::Error;

use crate::models::RoleCode;

/// Word the operator must type to confirm clearing a folder.
pub const CLEAR_CONFIRMATION: &str = "CLEAR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingCredentials,
    #[error("Please select a file to upload")]
    MissingFile,
    #[error("Please enter a folder path")]
    MissingFolder,
    #[error("Please type \"CLEAR\" to confirm")]
    ConfirmationMismatch,
    #[error("Invalid role: {0}")]
    InvalidRole(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: RoleCode,
}

pub fn validate_new_user(email: &str, password: &str, role: &str) -> Result<NewUser, FormError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(FormError::MissingCredentials);
    }
    Ok(NewUser {
        email: email.to_string(),
        password: password.to_string(),
        role: parse_role_choice(role)?,
    })
}

/// Role picked in a form; blank means no role.
pub fn parse_role_choice(raw: &str) -> Result<RoleCode, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(RoleCode::NONE);
    }
    raw.parse::<i64>()
        .map(RoleCode)
        .map_err(|_| FormError::InvalidRole(raw.to_string()))
}

/// Checks an upload request and returns the trimmed folder path.
pub fn validate_upload(file_name: Option<&str>, folder: &str) -> Result<String, FormError> {
    if file_name.map(str::trim).unwrap_or("").is_empty() {
        return Err(FormError::MissingFile);
    }
    folder_path(folder)
}

/// Checks a clear-folder request and returns the trimmed folder path.
pub fn validate_clear(folder: &str, confirmation: &str) -> Result<String, FormError> {
    let folder = folder_path(folder)?;
    if confirmation != CLEAR_CONFIRMATION {
        return Err(FormError::ConfirmationMismatch);
    }
    Ok(folder)
}

fn folder_path(raw: &str) -> Result<String, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(FormError::MissingFolder)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_requires_email_and_password() {
        assert_eq!(validate_new_user(" ", "pw", ""), Err(FormError::MissingCredentials));
        assert_eq!(validate_new_user("a@b", "", "10"), Err(FormError::MissingCredentials));
        let user = validate_new_user(" a@b ", "pw", "40").unwrap();
        assert_eq!(user.email, "a@b");
        assert_eq!(user.role, RoleCode::ADMIN);
        assert_eq!(validate_new_user("a@b", "pw", "").unwrap().role, RoleCode::NONE);
        assert!(matches!(validate_new_user("a@b", "pw", "boss"), Err(FormError::InvalidRole(_))));
    }

    #[test]
    fn clear_needs_exact_confirmation() {
        assert_eq!(validate_clear("/tmp", "clear"), Err(FormError::ConfirmationMismatch));
        assert_eq!(validate_clear("  ", "CLEAR"), Err(FormError::MissingFolder));
        assert_eq!(validate_clear(" /uploads/docs ", "CLEAR").unwrap(), "/uploads/docs");
    }

    #[test]
    fn upload_needs_file_and_folder() {
        assert_eq!(validate_upload(None, "/x"), Err(FormError::MissingFile));
        assert_eq!(validate_upload(Some("a.bin"), ""), Err(FormError::MissingFolder));
        assert_eq!(validate_upload(Some("a.bin"), "/x ").unwrap(), "/x");
    }
}
