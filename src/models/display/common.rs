//! Common display utilities and helpers

use serde_json::Value;

/// Label for a user reference that may be a bare id or a populated object
pub fn person_label(value: Option<&Value>) -> String {
    let label = match value {
        Some(Value::String(id)) => Some(id.as_str()),
        Some(Value::Object(fields)) => ["username", "email", "_id", "id"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str)),
        _ => None,
    };

    label
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("--")
        .to_string()
}

/// Show `--` for missing values
pub fn or_dash(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("--")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_label() {
        assert_eq!(person_label(Some(&json!("u1"))), "u1");
        assert_eq!(
            person_label(Some(&json!({ "_id": "u1", "username": "alice" }))),
            "alice"
        );
        assert_eq!(person_label(Some(&json!({ "_id": "u1" }))), "u1");
        assert_eq!(person_label(Some(&json!(null))), "--");
        assert_eq!(person_label(None), "--");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some("high")), "high");
        assert_eq!(or_dash(Some(" ")), "--");
        assert_eq!(or_dash(None), "--");
    }
}
