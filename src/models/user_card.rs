use serde::Serialize;

use crate::models::hardware::{GpuVendor, HardwareRecord, UNKNOWN_LABEL};
use crate::models::{RoleCode, RoleLabel, UserRecord};
use crate::services::hardware::parse_hardware;
use crate::services::memory::format_memory_gb;
use crate::utils::{last_login_display, path_segment};

/// Everything the user list shows for one record, in display form.
#[derive(Debug, Clone, Serialize)]
pub struct UserCard {
    pub email: String,
    pub email_path: String,
    pub role: RoleCode,
    pub role_label: RoleLabel,
    pub is_enabled: bool,
    pub last_login: String,
    pub queue_offset: Option<i64>,
    pub hardware_known: bool,
    pub cpu: String,
    pub gpu: String,
    pub gpu_class: &'static str,
    pub memory: String,
    pub drive: String,
}

impl UserCard {
    pub fn from_record(user: &UserRecord) -> UserCard {
        let hw = parse_hardware(&user.hardware);
        let gpu = hw.gpu().unwrap_or(UNKNOWN_LABEL).to_string();
        UserCard {
            email: user.email.clone(),
            email_path: path_segment(&user.email),
            role: user.role,
            role_label: user.role.label(),
            is_enabled: user.is_enabled,
            last_login: last_login_display(user.last_login()),
            queue_offset: user.queue_offset(),
            hardware_known: !matches!(hw, HardwareRecord::Unknown),
            cpu: hw.cpu().unwrap_or(UNKNOWN_LABEL).to_string(),
            gpu_class: GpuVendor::detect(&gpu).css_class(),
            gpu,
            memory: hw.memory().map(format_memory_gb).unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            drive: hw.drive().unwrap_or(UNKNOWN_LABEL).to_string(),
        }
    }

    pub fn toggle_action(&self) -> &'static str {
        if self.is_enabled {
            "disable"
        } else {
            "enable"
        }
    }

    pub fn queue_offset_text(&self) -> String {
        self.queue_offset.map(|n| n.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn card_formats_hardware_and_status() {
        let user = UserRecord::from_value(&json!({
            "email": "ops+1@example.com",
            "role": 10,
            "isEnabled": false,
            "lastLogin": 1_700_000_000,
            "hardware": "CPU: Ryzen 5. GPU: Radeon RX 6600. Memory: 67037080"
        }));
        let card = UserCard::from_record(&user);
        assert_eq!(card.email_path, "ops%2B1%40example.com");
        assert_eq!(card.role_label.text, "Operator");
        assert_eq!(card.memory, "64 GB");
        assert_eq!(card.gpu_class, "gpu-amd");
        assert_eq!(card.drive, "Unknown");
        assert_eq!(card.toggle_action(), "enable");
        assert_eq!(card.last_login, "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn unknown_hardware() {
        let card = UserCard::from_record(&UserRecord::from_value(&json!({"email": "x"})));
        assert!(!card.hardware_known);
        assert_eq!(card.cpu, "Unknown");
        assert_eq!(card.last_login, "Never");
    }
}
