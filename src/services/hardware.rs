//! Reading the free-form `hardware` property of a user record.
//!
//! Agents report hardware either as a JSON object, as a JSON object encoded
//! in a string, or as a sentence such as
//! `CPU: Intel i7. GPU: RTX 3060. Memory: 16777216. DriveSerial: S4X.`.
//! Anything that cannot be read becomes [`HardwareRecord::Unknown`].

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::models::{HardwareRecord, ParsedHardware};

struct LabelPatterns {
    cpu: Regex,
    gpu: Regex,
    memory: Regex,
    drive: Regex,
}

fn label_patterns() -> &'static LabelPatterns {
    static PATTERNS: OnceLock<LabelPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let segment = |label: &str| {
            Regex::new(&format!(r"(?i){}:\s*([^.]*)", label)).expect("valid hardware label regex")
        };
        LabelPatterns {
            cpu: segment("CPU"),
            gpu: segment("GPU"),
            memory: segment("Memory"),
            drive: segment("DriveSerial"),
        }
    })
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn from_object(obj: &Map<String, Value>) -> HardwareRecord {
    let hw = ParsedHardware {
        cpu: obj.get("cpu").and_then(field_text),
        gpu: obj.get("gpu").and_then(field_text),
        memory: obj.get("memory").and_then(field_text),
        drive: obj.get("drive").and_then(field_text),
    };
    if hw.is_empty() {
        HardwareRecord::Unknown
    } else {
        HardwareRecord::Parsed(hw)
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Pattern extraction from a labelled sentence. Each segment runs up to the
/// next period, so decimals inside a value are cut at the dot.
pub fn parse_labelled(text: &str) -> HardwareRecord {
    let p = label_patterns();
    let hw = ParsedHardware {
        cpu: capture(&p.cpu, text),
        gpu: capture(&p.gpu, text),
        memory: capture(&p.memory, text),
        drive: capture(&p.drive, text),
    };
    if hw.is_empty() {
        HardwareRecord::Unknown
    } else {
        HardwareRecord::Parsed(hw)
    }
}

/// Read a `hardware` value of any shape. Never fails.
pub fn parse_hardware(raw: &Value) -> HardwareRecord {
    match raw {
        Value::Object(obj) => from_object(obj),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(obj)) => from_object(&obj),
            Ok(_) => HardwareRecord::Unknown,
            Err(_) => parse_labelled(s),
        },
        _ => HardwareRecord::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(cpu: &str, gpu: &str, memory: &str, drive: &str) -> HardwareRecord {
        HardwareRecord::Parsed(ParsedHardware {
            cpu: Some(cpu.into()),
            gpu: Some(gpu.into()),
            memory: Some(memory.into()),
            drive: Some(drive.into()),
        })
    }

    #[test]
    fn labelled_sentence() {
        let raw = json!("CPU: X. GPU: Y. Memory: Z. DriveSerial: W.");
        assert_eq!(parse_hardware(&raw), parsed("X", "Y", "Z", "W"));
    }

    #[test]
    fn labelled_sentence_is_case_insensitive_and_partial() {
        let raw = json!("cpu:   AMD Ryzen 7 5800X   . memory: 33554432");
        let hw = parse_hardware(&raw);
        assert_eq!(hw.cpu(), Some("AMD Ryzen 7 5800X"));
        assert_eq!(hw.memory(), Some("33554432"));
        assert_eq!(hw.gpu(), None);
        assert_eq!(hw.drive(), None);
    }

    #[test]
    fn json_object_round_trips() {
        let raw = json!({"cpu": "X", "gpu": "Y", "memory": "Z", "drive": "W"});
        assert_eq!(parse_hardware(&raw), parsed("X", "Y", "Z", "W"));
    }

    #[test]
    fn json_encoded_string() {
        let raw = json!(r#"{"cpu":"i9-13900K","gpu":"RTX 4090","memory":67037080,"drive":"S5"}"#);
        let hw = parse_hardware(&raw);
        assert_eq!(hw.cpu(), Some("i9-13900K"));
        assert_eq!(hw.memory(), Some("67037080"));
    }

    #[test]
    fn nothing_usable_is_unknown() {
        assert_eq!(parse_hardware(&Value::Null), HardwareRecord::Unknown);
        assert_eq!(parse_hardware(&json!("no hardware here")), HardwareRecord::Unknown);
        assert_eq!(parse_hardware(&json!("42")), HardwareRecord::Unknown);
        assert_eq!(parse_hardware(&json!({})), HardwareRecord::Unknown);
        assert_eq!(parse_hardware(&json!(12)), HardwareRecord::Unknown);
    }
}
