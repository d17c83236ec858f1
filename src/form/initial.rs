//! Initial value resolution

use serde_json::Value;

use crate::domain::{is_truthy, FormValues, ParameterType};

/// Pick the value a field is registered with.
///
/// Precedence: a truthy externally supplied initial value, then the default
/// when truthy, then the constant, then the (falsy) default. JSON fields get
/// text: the serialized value when it has keys, otherwise the empty string.
pub fn resolve_initial_value(
    id: &str,
    param_type: &ParameterType,
    default_value: Option<&Value>,
    constant_value: Option<&Value>,
    initial_values: &FormValues,
) -> Option<Value> {
    if let Some(initial) = initial_values.lookup(id).filter(is_truthy) {
        return Some(initial);
    }

    let calculated = default_value
        .filter(|v| is_truthy(v))
        .or(constant_value)
        .or(default_value);

    match param_type {
        ParameterType::Json => Some(json_text(calculated)),
        _ => calculated.cloned(),
    }
}

fn json_text(value: Option<&Value>) -> Value {
    let has_keys = match value {
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::String(s)) => !s.is_empty(),
        _ => false,
    };

    match value {
        Some(v) if has_keys => Value::String(v.to_string()),
        _ => Value::String(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn initial(pairs: &[(&str, Value)]) -> FormValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_external_initial_value_wins() {
        let values = initial(&[("host", json!("db.internal"))]);
        let resolved = resolve_initial_value(
            "host",
            &ParameterType::String,
            Some(&json!("localhost")),
            None,
            &values,
        );
        assert_eq!(resolved, Some(json!("db.internal")));
    }

    #[test]
    fn test_falsy_initial_value_falls_through() {
        let values = initial(&[("host", json!(""))]);
        let resolved = resolve_initial_value(
            "host",
            &ParameterType::String,
            Some(&json!("localhost")),
            None,
            &values,
        );
        assert_eq!(resolved, Some(json!("localhost")));
    }

    #[test]
    fn test_constant_used_when_default_falsy() {
        let resolved = resolve_initial_value(
            "port",
            &ParameterType::Int,
            Some(&json!(0)),
            Some(&json!("5432")),
            &FormValues::new(),
        );
        assert_eq!(resolved, Some(json!("5432")));
    }

    #[test]
    fn test_falsy_default_kept_without_constant() {
        let resolved = resolve_initial_value(
            "enabled",
            &ParameterType::Boolean,
            Some(&json!(false)),
            None,
            &FormValues::new(),
        );
        assert_eq!(resolved, Some(json!(false)));
    }

    #[test]
    fn test_nothing_resolves_to_none() {
        let resolved = resolve_initial_value("x", &ParameterType::String, None, None, &FormValues::new());
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_json_without_value_is_empty_text() {
        let resolved = resolve_initial_value("extra", &ParameterType::Json, None, None, &FormValues::new());
        assert_eq!(resolved, Some(json!("")));

        let resolved = resolve_initial_value(
            "extra",
            &ParameterType::Json,
            Some(&json!({})),
            None,
            &FormValues::new(),
        );
        assert_eq!(resolved, Some(json!("")));
    }

    #[test]
    fn test_json_object_default_serialized() {
        let default = json!({ "ssl": true, "timeout": 30 });
        let resolved = resolve_initial_value(
            "extra",
            &ParameterType::Json,
            Some(&default),
            None,
            &FormValues::new(),
        );

        let text = resolved.as_ref().and_then(Value::as_str).unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, default);
    }

    #[test]
    fn test_json_external_initial_kept_verbatim() {
        let values = initial(&[("extra", json!("{\"a\":1}"))]);
        let resolved = resolve_initial_value("extra", &ParameterType::Json, None, None, &values);
        assert_eq!(resolved, Some(json!("{\"a\":1}")));
    }
}
