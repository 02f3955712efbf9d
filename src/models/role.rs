use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

/// Integer authorization level as reported by the backend.
///
/// Any integer is representable; the canonical levels are the associated
/// constants below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RoleCode(pub i64);

/// Display label for a role badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleLabel {
    pub text: String,
    pub css_class: &'static str,
}

fn first_integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+").expect("valid integer regex"))
}

impl RoleCode {
    pub const NONE: RoleCode = RoleCode(0);
    pub const OPERATOR: RoleCode = RoleCode(10);
    pub const VALIDATOR: RoleCode = RoleCode(20);
    pub const COMPANION_PC: RoleCode = RoleCode(30);
    pub const ADMIN: RoleCode = RoleCode(40);
    pub const RESOURCE_UPLOADER: RoleCode = RoleCode(50);
    pub const API_ADMIN: RoleCode = RoleCode(1000);

    /// Selectable roles, in the order the console offers them.
    pub const ALL: [RoleCode; 7] = [
        RoleCode::NONE,
        RoleCode::OPERATOR,
        RoleCode::VALIDATOR,
        RoleCode::COMPANION_PC,
        RoleCode::ADMIN,
        RoleCode::RESOURCE_UPLOADER,
        RoleCode::API_ADMIN,
    ];

    /// Resolve a raw role value of unknown type.
    ///
    /// Numbers are taken as is (truncated), strings yield their first
    /// embedded integer (`"Admin(40)"` is 40), anything else falls back to
    /// a numeric coercion and finally to 0.
    pub fn from_value(raw: &Value) -> RoleCode {
        match raw {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .map(RoleCode)
                .unwrap_or_default(),
            Value::String(s) => RoleCode::from_text(s),
            Value::Bool(true) => RoleCode(1),
            _ => RoleCode::NONE,
        }
    }

    pub fn from_text(s: &str) -> RoleCode {
        if let Some(m) = first_integer_regex().find(s) {
            if let Ok(n) = m.as_str().parse::<i64>() {
                return RoleCode(n);
            }
        }
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| RoleCode(f.trunc() as i64))
            .unwrap_or_default()
    }

    pub fn code(self) -> i64 {
        self.0
    }

    pub fn label(self) -> RoleLabel {
        let (text, css_class) = match self.0 {
            0 => ("None", "none"),
            10 => ("Operator", "operator"),
            20 => ("Validator", "validator"),
            30 => ("CompanionPC", "companion"),
            40 => ("Admin", "admin"),
            50 => ("ResourceUploader", "uploader"),
            1000 => ("ApiAdmin", "apiadmin"),
            n => return RoleLabel { text: format!("Role {}", n), css_class: "none" },
        };
        RoleLabel { text: text.to_string(), css_class }
    }

    /// Roles allowed to use the console at all.
    pub fn can_use_console(self) -> bool {
        self == RoleCode::ADMIN || self == RoleCode::API_ADMIN
    }
}

impl fmt::Display for RoleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Value> for RoleCode {
    fn from(raw: &Value) -> Self {
        RoleCode::from_value(raw)
    }
}

impl<'de> Deserialize<'de> for RoleCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(RoleCode::from_value(&raw))
    }
}

impl Serialize for RoleCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_embedded_integer() {
        assert_eq!(RoleCode::from_value(&json!("Admin(40)")), RoleCode::ADMIN);
        assert_eq!(RoleCode::from_value(&json!("role -5 then 7")), RoleCode(-5));
    }

    #[test]
    fn resolves_numbers_and_null() {
        assert_eq!(RoleCode::from_value(&json!(40)), RoleCode(40));
        assert_eq!(RoleCode::from_value(&json!(1000.0)), RoleCode::API_ADMIN);
        assert_eq!(RoleCode::from_value(&Value::Null), RoleCode::NONE);
        assert_eq!(RoleCode::from_value(&json!("Operator")), RoleCode::NONE);
    }

    #[test]
    fn labels_cover_known_codes() {
        assert_eq!(RoleCode::API_ADMIN.label().text, "ApiAdmin");
        assert_eq!(RoleCode::COMPANION_PC.label().css_class, "companion");
        let other = RoleCode(77).label();
        assert_eq!(other.text, "Role 77");
        assert_eq!(other.css_class, "none");
    }

    #[test]
    fn only_admin_levels_use_console() {
        assert!(RoleCode::ADMIN.can_use_console());
        assert!(RoleCode::API_ADMIN.can_use_console());
        assert!(!RoleCode::RESOURCE_UPLOADER.can_use_console());
    }

    #[test]
    fn deserializes_from_mixed_payloads() {
        let codes: Vec<RoleCode> = serde_json::from_value(json!([10, "20", "x(30)", null])).unwrap();
        assert_eq!(codes, vec![RoleCode(10), RoleCode(20), RoleCode(30), RoleCode(0)]);
    }
}
