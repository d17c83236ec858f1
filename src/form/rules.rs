//! Field-level validation rules

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A validation rule attached to a visible field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present and non-empty
    Required { message: String },
    /// Value must be an ISO 8601 date; empty passes unless `required`
    IsoDate { required: bool, message: String },
}

/// A failed rule on one field
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub id: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.message)
    }
}

/// Message used by every rule of a field
pub fn required_message(display_name: &str) -> String {
    format!("{} field is required.", display_name)
}

impl Rule {
    /// Check `value`; the error carries the rule message
    pub fn check(&self, value: Option<&Value>) -> Result<(), String> {
        match self {
            Rule::Required { message } => {
                if is_empty(value) {
                    Err(message.clone())
                } else {
                    Ok(())
                }
            }
            Rule::IsoDate { required, message } => {
                if is_empty(value) {
                    return if *required { Err(message.clone()) } else { Ok(()) };
                }
                match value.and_then(Value::as_str) {
                    Some(text) if is_iso_date(text) => Ok(()),
                    _ => Err(message.clone()),
                }
            }
        }
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Accepts `YYYY-MM-DD`, a zone-less date-time, or an RFC 3339 date-time
pub fn is_iso_date(text: &str) -> bool {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_message_template() {
        assert_eq!(required_message("Host"), "Host field is required.");
    }

    #[test]
    fn test_required_rule() {
        let rule = Rule::Required {
            message: required_message("Host"),
        };
        assert_eq!(rule.check(Some(&json!(""))), Err("Host field is required.".to_string()));
        assert_eq!(rule.check(None), Err("Host field is required.".to_string()));
        assert_eq!(rule.check(Some(&json!([]))), Err("Host field is required.".to_string()));
        assert!(rule.check(Some(&json!("x"))).is_ok());
        assert!(rule.check(Some(&json!(false))).is_ok());
    }

    #[test]
    fn test_iso_date_rule() {
        let rule = Rule::IsoDate {
            required: false,
            message: required_message("Start"),
        };
        assert!(rule.check(None).is_ok());
        assert!(rule.check(Some(&json!("2024-02-29"))).is_ok());
        assert!(rule.check(Some(&json!("2024-02-29T10:00:00Z"))).is_ok());
        assert!(rule.check(Some(&json!("2024-02-29T10:00:00.250"))).is_ok());
        assert!(rule.check(Some(&json!("2023-02-29"))).is_err());
        assert!(rule.check(Some(&json!("yesterday"))).is_err());
        assert!(rule.check(Some(&json!(20240101))).is_err());
    }

    #[test]
    fn test_required_iso_date_rejects_empty() {
        let rule = Rule::IsoDate {
            required: true,
            message: required_message("Start"),
        };
        assert_eq!(rule.check(Some(&json!(""))), Err("Start field is required.".to_string()));
    }
}
