use serde_json::Value;

/// Convert a JSON value to a short string representation for table cells
pub fn value_to_short_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(value_to_short_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
        Value::Null => String::new(),
    }
}

/// Loose truthiness used for optional backend fields: null, `false`, `0`
/// and `""` count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Pretty JSON for error panels; strings that hold JSON are re-indented.
pub fn format_json(value: &Value) -> String {
    if let Value::String(s) = value {
        return match serde_json::from_str::<Value>(s) {
            Ok(parsed) => serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| s.clone()),
            Err(_) => s.clone(),
        };
    }
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_render_as_compact_json() {
        assert_eq!(value_to_short_string(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(value_to_short_string(&json!(["x", 2])), "x, 2");
        assert_eq!(value_to_short_string(&Value::Null), "");
    }

    #[test]
    fn truthiness_matches_optional_field_rules() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(12)));
    }

    #[test]
    fn format_json_reindents_embedded_json() {
        assert_eq!(format_json(&json!("{\"a\":1}")), "{\n  \"a\": 1\n}");
        assert_eq!(format_json(&json!("not json")), "not json");
    }
}
