use serde::{Deserialize, Serialize};

/// Destructive user actions that go through a confirmation page first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmationAction {
    DeleteUser,
    ResetHardware,
    DisableUser,
}

impl ConfirmationAction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "delete" | "delete-user" => Some(Self::DeleteUser),
            "reset-hardware" => Some(Self::ResetHardware),
            "disable" | "disable-user" => Some(Self::DisableUser),
            _ => None,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Self::DeleteUser => "delete",
            Self::ResetHardware => "reset-hardware",
            Self::DisableUser => "disable",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::DeleteUser => "Delete user",
            Self::ResetHardware => "Reset hardware",
            Self::DisableUser => "Disable user",
        }
    }

    pub fn prompt(&self, email: &str) -> String {
        match self {
            Self::DeleteUser => format!("Delete user {}? This cannot be undone.", email),
            Self::ResetHardware => format!("Reset the hardware binding of {}?", email),
            Self::DisableUser => format!("Disable {}? The user will not be able to sign in.", email),
        }
    }

    /// Form target that performs the action.
    pub fn action_path(&self, email_path: &str) -> String {
        format!("/users/{}/{}", email_path, self.to_str())
    }
}
