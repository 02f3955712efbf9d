use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::RoleCode;
use crate::utils::{is_truthy, value_to_short_string};

/// Timestamp fields the backend has used for "last activity", in lookup order.
pub const LAST_LOGIN_FIELDS: [&str; 10] = [
    "lastLogin",
    "last_login",
    "lastLoginAt",
    "last_login_at",
    "lastSeen",
    "last_seen",
    "lastSeenAt",
    "last_seen_at",
    "last_activity",
    "lastActivity",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueOffsets {
    pub annotations_offset: Option<i64>,
    pub annotations_confirm_offset: Option<i64>,
    pub annotations_commands_offset: Option<i64>,
}

/// One user as returned by `/users`. Decoding never fails: unknown fields
/// are kept in `extra`, missing ones take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub role: RoleCode,
    pub hardware: Value,
    pub is_enabled: bool,
    pub queue_offsets: Option<QueueOffsets>,
    pub extra: Map<String, Value>,
}

fn offset(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
}

impl UserRecord {
    pub fn from_value(raw: &Value) -> UserRecord {
        let obj = match raw.as_object() {
            Some(o) => o.clone(),
            None => return UserRecord { is_enabled: true, ..Default::default() },
        };
        let text = |key: &str| obj.get(key).map(value_to_short_string).unwrap_or_default();
        let queue_offsets = obj
            .get("userConfig")
            .and_then(|c| c.get("queueOffsets"))
            .and_then(|q| q.as_object())
            .map(|q| QueueOffsets {
                annotations_offset: offset(q, "annotationsOffset"),
                annotations_confirm_offset: offset(q, "annotationsConfirmOffset"),
                annotations_commands_offset: offset(q, "annotationsCommandsOffset"),
            });

        UserRecord {
            id: text("id"),
            email: text("email"),
            role: obj.get("role").map(RoleCode::from_value).unwrap_or_default(),
            hardware: obj.get("hardware").cloned().unwrap_or(Value::Null),
            is_enabled: !matches!(obj.get("isEnabled"), Some(Value::Bool(false))),
            queue_offsets,
            extra: obj,
        }
    }

    /// First truthy last-activity field.
    pub fn last_login(&self) -> Option<&Value> {
        LAST_LOGIN_FIELDS
            .iter()
            .filter_map(|k| self.extra.get(*k))
            .find(|v| is_truthy(v))
    }

    /// Queue offset shown on the user card; hidden when zero or absent.
    pub fn queue_offset(&self) -> Option<i64> {
        self.queue_offsets
            .as_ref()
            .and_then(|q| q.annotations_offset)
            .filter(|n| *n != 0)
    }
}

/// Records in a payload: each element of an array, a lone object as one
/// record, nothing for anything else.
pub fn users_from_value(payload: &Value) -> Vec<UserRecord> {
    match payload {
        Value::Array(items) => items.iter().map(UserRecord::from_value).collect(),
        Value::Object(_) => vec![UserRecord::from_value(payload)],
        _ => Vec::new(),
    }
}

/// Operators first, everything else after, each group in original order.
pub fn operators_first(users: Vec<UserRecord>) -> Vec<UserRecord> {
    let (mut ops, rest): (Vec<_>, Vec<_>) =
        users.into_iter().partition(|u| u.role == RoleCode::OPERATOR);
    ops.extend(rest);
    ops
}
