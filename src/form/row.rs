//! Row composition: one row per parameter, in list order

use serde_json::Value;

use super::control::ControlKind;
use super::initial::resolve_initial_value;
use super::rules::{required_message, Rule};
use crate::domain::{FormValues, Parameter, ParameterType};

/// CSS class carried by rows whose value is a constant
pub const HIDDEN_CLASS: &str = "hidden";

/// Everything needed to render one parameter
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRow {
    pub id: String,
    /// Bound field name, the identifier with the optional prefix
    pub name: String,
    pub display_name: String,
    pub documentation: Option<String>,
    pub control: ControlKind,
    pub constant_value: Option<Value>,
    pub hidden: bool,
    pub initial_value: Option<Value>,
    /// `None` while hidden
    pub rules: Option<Vec<Rule>>,
}

impl FieldRow {
    pub fn class(&self) -> &'static str {
        if self.hidden {
            HIDDEN_CLASS
        } else {
            ""
        }
    }

    /// Plain label text; documented fields show their documentation as a
    /// tooltip instead of the trailing colon
    pub fn label(&self) -> String {
        match self.documentation {
            Some(_) => self.display_name.clone(),
            None => format!("{}:", self.display_name),
        }
    }

    /// Message of the first rule `value` fails; hidden rows never fail
    pub fn error_for(&self, value: Option<&Value>) -> Option<String> {
        self.rules.as_ref()?.iter().find_map(|rule| rule.check(value).err())
    }
}

/// Compose one row against the marshalled aggregated values
pub fn compose_row(
    param: &Parameter,
    aggregated: &Value,
    initial_values: &FormValues,
    name_prefix: Option<&str>,
) -> FieldRow {
    let constant_value = param.constant.as_ref().and_then(|c| c.resolve(aggregated));
    let hidden = constant_value.is_some();

    let initial_value = resolve_initial_value(
        &param.id,
        &param.param_type,
        param.default_value.as_ref(),
        constant_value.as_ref(),
        initial_values,
    );

    let rules = (!hidden).then(|| match param.param_type {
        ParameterType::IsoUtcDate => vec![Rule::IsoDate {
            required: param.required,
            message: required_message(&param.display_name),
        }],
        _ if param.required => vec![Rule::Required {
            message: required_message(&param.display_name),
        }],
        _ => Vec::new(),
    });

    FieldRow {
        id: param.id.clone(),
        name: format!("{}{}", name_prefix.unwrap_or_default(), param.id),
        display_name: param.display_name.clone(),
        documentation: param.documentation.clone(),
        control: ControlKind::for_type(&param.param_type),
        constant_value,
        hidden,
        initial_value,
        rules,
    }
}

/// Compose every row, preserving list order
pub fn compose_rows(
    params: &[Parameter],
    values: &FormValues,
    initial_values: &FormValues,
    name_prefix: Option<&str>,
) -> Vec<FieldRow> {
    let aggregated = values.marshal();
    params
        .iter()
        .map(|param| compose_row(param, &aggregated, initial_values, name_prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Constant;
    use serde_json::json;

    #[test]
    fn test_constant_row_is_hidden_without_rules() {
        let param = Parameter::new("kind", "Kind", ParameterType::String)
            .with_constant(Constant::Literal(json!("postgres")))
            .required();
        let row = compose_row(&param, &json!({}), &FormValues::new(), None);

        assert!(row.hidden);
        assert_eq!(row.class(), HIDDEN_CLASS);
        assert_eq!(row.rules, None);
        assert_eq!(row.initial_value, Some(json!("postgres")));
    }

    #[test]
    fn test_computed_constant_reads_nested_values() {
        let param = Parameter::new("port", "Port", ParameterType::Int).with_constant(Constant::computed(|values| {
            (values.pointer("/db/mode")? == "managed").then(|| json!("5432"))
        }));

        let managed = compose_row(&param, &json!({ "db": { "mode": "managed" } }), &FormValues::new(), None);
        assert!(managed.hidden);
        assert_eq!(managed.constant_value, Some(json!("5432")));

        let custom = compose_row(&param, &json!({ "db": { "mode": "custom" } }), &FormValues::new(), None);
        assert!(!custom.hidden);
        assert_eq!(custom.rules, Some(vec![]));
    }

    #[test]
    fn test_required_rule_uses_display_name() {
        let param = Parameter::new("host", "Host", ParameterType::String).required();
        let row = compose_row(&param, &json!({}), &FormValues::new(), None);
        assert_eq!(
            row.rules,
            Some(vec![Rule::Required {
                message: "Host field is required.".to_string()
            }])
        );
    }

    #[test]
    fn test_iso_date_gets_date_rule() {
        let param = Parameter::new("start", "Start date", ParameterType::IsoUtcDate);
        let row = compose_row(&param, &json!({}), &FormValues::new(), None);
        assert_eq!(
            row.rules,
            Some(vec![Rule::IsoDate {
                required: false,
                message: "Start date field is required.".to_string()
            }])
        );
    }

    #[test]
    fn test_error_for_reports_rule_message() {
        let param = Parameter::new("host", "Host", ParameterType::String).required();
        let row = compose_row(&param, &json!({}), &FormValues::new(), None);
        assert_eq!(row.error_for(Some(&json!(""))), Some("Host field is required.".to_string()));
        assert_eq!(row.error_for(Some(&json!("db"))), None);

        let hidden = compose_row(
            &param.clone().with_constant(Constant::Literal(json!("db"))),
            &json!({}),
            &FormValues::new(),
            None,
        );
        assert_eq!(hidden.error_for(None), None);
    }

    #[test]
    fn test_rows_keep_order_and_prefix() {
        let params = vec![
            Parameter::new("b", "B", ParameterType::String),
            Parameter::new("a", "A", ParameterType::Boolean).with_documentation("Toggle a"),
        ];
        let rows = compose_rows(&params, &FormValues::new(), &FormValues::new(), Some("src-"));
        let ids: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(ids, vec!["src-b", "src-a"]);
        assert_eq!(rows[0].label(), "B:");
        assert_eq!(rows[1].label(), "A");
        assert_eq!(rows[1].control, ControlKind::Toggle);
    }
}
