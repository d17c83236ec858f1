//! One-shot evaluation of a configured form, as run by the command line

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Settings;
use crate::form::{FieldError, FormEngine};

/// Rendered state of one row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowReport {
    pub id: String,
    pub name: String,
    pub label: String,
    pub control: &'static str,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Outcome of evaluating a form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub rows: Vec<RowReport>,
    /// Nested submission object; absent when validation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    /// Number of change events that asked for a touch notification
    pub touched: usize,
}

impl Evaluation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Build the form from `settings`, replay `assignments` as change events,
/// then validate and submit
pub fn evaluate(settings: &Settings, assignments: &[(String, String)]) -> Result<Evaluation, anyhow::Error> {
    let params = settings.parameters()?;
    let mut engine = FormEngine::new(
        params,
        settings.initial_values.clone(),
        settings.form.name_prefix.clone(),
    );

    let mut touched = 0;
    for (id, raw) in assignments {
        let row = engine
            .row(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown field in assignment: {}", id))?;
        let input = row.control.input_from_text(raw);
        let outcome = engine.handle_change(id, input)?;
        if !outcome.recomputed.is_empty() {
            debug!("{} changed constants {:?}", id, outcome.recomputed);
        }
        if outcome.touched {
            touched += 1;
        }
    }

    let values = engine.values();
    let rows = engine
        .rows()
        .into_iter()
        .map(|row| RowReport {
            value: values.get(&row.id).cloned(),
            label: row.label(),
            control: row.control.name(),
            id: row.id,
            name: row.name,
            hidden: row.hidden,
        })
        .collect();

    let (submitted, errors) = match engine.submit() {
        Ok(submitted) => (Some(submitted), Vec::new()),
        Err(errors) => (None, errors),
    };
    info!(
        "Evaluated {} fields: {} errors, {} touched",
        engine.params().len(),
        errors.len(),
        touched
    );

    Ok(Evaluation {
        rows,
        submitted,
        errors,
        touched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParameterConfig, ParameterType, SelectOption};
    use serde_json::json;

    fn settings() -> Settings {
        let mode = ParameterConfig {
            id: "mode".to_string(),
            display_name: "Mode".to_string(),
            documentation: None,
            param_type: ParameterType::selection(vec![
                SelectOption::new("managed", "Managed"),
                SelectOption::new("custom", "Custom"),
            ]),
            default_value: Some(json!("managed")),
            constant: None,
            constant_template: None,
            required: false,
        };
        let port = ParameterConfig {
            id: "db.port".to_string(),
            display_name: "Port".to_string(),
            documentation: Some("Listening port".to_string()),
            param_type: ParameterType::Int,
            default_value: None,
            constant: None,
            constant_template: Some("{% if mode == \"managed\" %}5432{% endif %}".to_string()),
            required: true,
        };

        Settings {
            parameters: vec![mode, port],
            ..Default::default()
        }
    }

    #[test]
    fn test_evaluate_defaults() {
        let evaluation = evaluate(&settings(), &[]).unwrap();
        assert!(evaluation.is_valid());
        assert_eq!(evaluation.touched, 0);
        assert!(evaluation.rows[1].hidden);
        assert_eq!(
            evaluation.submitted,
            Some(json!({ "mode": "managed", "db": { "port": "5432" } }))
        );
    }

    #[test]
    fn test_evaluate_assignments_reveal_and_validate() {
        let evaluation = evaluate(&settings(), &[("mode".to_string(), "custom".to_string())]).unwrap();
        assert_eq!(evaluation.touched, 1);
        assert!(!evaluation.rows[1].hidden);
        // the stale constant stays until the user edits it
        assert!(evaluation.is_valid());

        let evaluation = evaluate(
            &settings(),
            &[
                ("mode".to_string(), "custom".to_string()),
                ("db.port".to_string(), "x".to_string()),
            ],
        )
        .unwrap();
        assert_eq!(
            evaluation.errors,
            vec![FieldError {
                id: "db.port".to_string(),
                message: "Port field is required.".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_assignment_fails() {
        let result = evaluate(&settings(), &[("nope".to_string(), "1".to_string())]);
        assert!(result.is_err());
    }
}
