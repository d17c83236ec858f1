//! Form engine: binds parameters to a form store, handles change events and
//! keeps constant fields in sync with the values they derive from

use serde_json::Value;
use tracing::{debug, trace};

use super::control::FieldInput;
use super::row::{compose_row, compose_rows, FieldRow};
use super::rules::FieldError;
use crate::domain::{FormStore, FormValues, Parameter};
use crate::error::{FormError, FormResult};

/// Result of one handled change event
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeOutcome {
    pub id: String,
    /// Value committed to the store
    pub value: Value,
    /// Constant fields whose value changed as a consequence
    pub recomputed: Vec<String>,
    /// Whether callers should fire their "field touched" notification.
    /// Every control type notifies.
    pub touched: bool,
}

/// Engine driving one configurable fields form
#[derive(Clone, Debug)]
pub struct FormEngine<S: FormStore = FormValues> {
    params: Vec<Parameter>,
    store: S,
    initial_values: FormValues,
    name_prefix: Option<String>,
}

impl FormEngine<FormValues> {
    /// Engine over an in-memory store
    pub fn new(params: Vec<Parameter>, initial_values: FormValues, name_prefix: Option<String>) -> Self {
        Self::with_store(FormValues::new(), params, initial_values, name_prefix)
    }
}

impl<S: FormStore> FormEngine<S> {
    /// Register every field with its initial value, in list order, then
    /// bring constants up to date.
    ///
    /// Fields already present in the store keep their value.
    pub fn with_store(
        store: S,
        params: Vec<Parameter>,
        initial_values: FormValues,
        name_prefix: Option<String>,
    ) -> Self {
        let mut engine = Self {
            params,
            store,
            initial_values,
            name_prefix,
        };
        engine.mount();
        engine
    }

    fn mount(&mut self) {
        let mut values = self.store.fields_value();
        for param in &self.params {
            if values.contains(&param.id) {
                continue;
            }
            let row = compose_row(param, &values.marshal(), &self.initial_values, self.name_prefix.as_deref());
            if let Some(initial) = row.initial_value {
                trace!("Registering {} with {}", param.id, initial);
                values.set(param.id.clone(), initial);
            }
        }
        self.store.set_fields_value(values);
        self.recompute_constants();
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn name_prefix(&self) -> Option<&str> {
        self.name_prefix.as_deref()
    }

    /// Snapshot of all field values
    pub fn values(&self) -> FormValues {
        self.store.fields_value()
    }

    pub fn value(&self, id: &str) -> Option<Value> {
        self.store.field_value(id)
    }

    /// Rows for the current values
    pub fn rows(&self) -> Vec<FieldRow> {
        compose_rows(
            &self.params,
            &self.store.fields_value(),
            &self.initial_values,
            self.name_prefix.as_deref(),
        )
    }

    pub fn row(&self, id: &str) -> Option<FieldRow> {
        let param = self.params.iter().find(|p| p.id == id)?;
        let aggregated = self.store.fields_value().marshal();
        Some(compose_row(param, &aggregated, &self.initial_values, self.name_prefix.as_deref()))
    }

    /// Commit a change event from the control of `id`
    pub fn handle_change(&mut self, id: &str, input: FieldInput) -> FormResult<ChangeOutcome> {
        let row = self.row(id).ok_or_else(|| FormError::UnknownField(id.to_string()))?;
        if row.hidden {
            return Err(FormError::ConstantField(id.to_string()));
        }

        let value = row.control.commit(id, input)?;
        debug!("Field {} changed to {}", id, value);

        let mut update = FormValues::new();
        update.set(id, value.clone());
        self.store.set_fields_value(update);

        let recomputed = self.recompute_constants();
        Ok(ChangeOutcome {
            id: id.to_string(),
            value,
            recomputed,
            touched: true,
        })
    }

    /// Merge values set programmatically and recompute constants
    pub fn set_values(&mut self, values: FormValues) -> Vec<String> {
        self.store.set_fields_value(values);
        self.recompute_constants()
    }

    /// Re-resolve every constant against the current values and store the
    /// ones that changed. Repeats until nothing changes, at most once per
    /// parameter, so constants may depend on other constants.
    pub fn recompute_constants(&mut self) -> Vec<String> {
        let mut changed: Vec<String> = Vec::new();

        for _ in 0..self.params.len().max(1) {
            let values = self.store.fields_value();
            let aggregated = values.marshal();
            let mut update = FormValues::new();

            for param in &self.params {
                let Some(constant) = &param.constant else {
                    continue;
                };
                if let Some(resolved) = constant.resolve(&aggregated) {
                    if values.get(&param.id) != Some(&resolved) {
                        update.set(param.id.clone(), resolved);
                    }
                }
            }

            if update.is_empty() {
                break;
            }
            for (id, _) in update.iter() {
                if !changed.contains(id) {
                    changed.push(id.clone());
                }
            }
            self.store.set_fields_value(update);
        }

        if !changed.is_empty() {
            debug!("Recomputed constant fields: {:?}", changed);
        }
        changed
    }

    /// Run every visible field's rules
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let values = self.store.fields_value();
        let errors: Vec<FieldError> = self
            .rows()
            .into_iter()
            .filter_map(|row| {
                let message = row.error_for(values.get(&row.id))?;
                Some(FieldError { id: row.id, message })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, then marshal every value (hidden ones included) into a
    /// nested object
    pub fn submit(&self) -> Result<Value, Vec<FieldError>> {
        self.validate()?;
        Ok(self.store.fields_value().marshal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constant, ParameterType, SelectOption};
    use serde_json::json;

    fn params() -> Vec<Parameter> {
        vec![
            Parameter::new(
                "mode",
                "Mode",
                ParameterType::selection(vec![
                    SelectOption::new("managed", "Managed"),
                    SelectOption::new("custom", "Custom"),
                ]),
            )
            .with_default(json!("managed")),
            Parameter::new("port", "Port", ParameterType::Int)
                .required()
                .with_constant(Constant::computed(|values| {
                    (values.get("mode")? == "managed").then(|| json!("5432"))
                })),
            Parameter::new("host", "Host", ParameterType::String).required(),
        ]
    }

    #[test]
    fn test_mount_registers_initial_and_constant_values() {
        let engine = FormEngine::new(params(), FormValues::new(), None);
        assert_eq!(engine.value("mode"), Some(json!("managed")));
        assert_eq!(engine.value("port"), Some(json!("5432")));
        assert_eq!(engine.value("host"), None);
    }

    #[test]
    fn test_selection_change_reveals_dependent_field() {
        let mut engine = FormEngine::new(params(), FormValues::new(), None);
        assert!(engine.row("port").unwrap().hidden);

        let outcome = engine
            .handle_change("mode", FieldInput::Selected(vec!["custom".to_string()]))
            .unwrap();
        assert!(outcome.touched);
        assert!(!engine.row("port").unwrap().hidden);

        engine
            .handle_change("port", FieldInput::Text("80a80".to_string()))
            .unwrap();
        assert_eq!(engine.value("port"), Some(json!("8080")));
    }

    #[test]
    fn test_constant_field_rejects_edits() {
        let mut engine = FormEngine::new(params(), FormValues::new(), None);
        let err = engine
            .handle_change("port", FieldInput::Text("1".to_string()))
            .unwrap_err();
        assert!(matches!(err, FormError::ConstantField(_)));
    }

    #[test]
    fn test_unknown_field() {
        let mut engine = FormEngine::new(params(), FormValues::new(), None);
        let err = engine
            .handle_change("nope", FieldInput::Text(String::new()))
            .unwrap_err();
        assert!(matches!(err, FormError::UnknownField(_)));
    }

    #[test]
    fn test_constant_recomputed_when_input_returns() {
        let mut engine = FormEngine::new(params(), FormValues::new(), None);
        engine
            .handle_change("mode", FieldInput::Selected(vec!["custom".to_string()]))
            .unwrap();
        engine
            .handle_change("port", FieldInput::Text("9000".to_string()))
            .unwrap();

        let outcome = engine
            .handle_change("mode", FieldInput::Selected(vec!["managed".to_string()]))
            .unwrap();
        assert_eq!(outcome.recomputed, vec!["port".to_string()]);
        assert_eq!(engine.value("port"), Some(json!("5432")));
    }

    #[test]
    fn test_chained_constants_reach_fixpoint() {
        let params = vec![
            Parameter::new("c", "C", ParameterType::String).with_constant(Constant::computed(|v| {
                v.get("b").cloned()
            })),
            Parameter::new("b", "B", ParameterType::String).with_constant(Constant::computed(|v| {
                v.get("a").cloned()
            })),
            Parameter::new("a", "A", ParameterType::String),
        ];
        let mut engine = FormEngine::new(params, FormValues::new(), None);
        engine
            .handle_change("a", FieldInput::Text("x".to_string()))
            .unwrap();
        assert_eq!(engine.value("b"), Some(json!("x")));
        assert_eq!(engine.value("c"), Some(json!("x")));
    }

    #[test]
    fn test_validate_reports_required_fields() {
        let engine = FormEngine::new(params(), FormValues::new(), None);
        let errors = engine.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError {
                id: "host".to_string(),
                message: "Host field is required.".to_string(),
            }]
        );
    }

    #[test]
    fn test_submit_includes_hidden_values() {
        let mut engine = FormEngine::new(params(), FormValues::new(), None);
        engine
            .handle_change("host", FieldInput::Text("db".to_string()))
            .unwrap();
        let submitted = engine.submit().unwrap();
        assert_eq!(submitted, json!({ "mode": "managed", "port": "5432", "host": "db" }));
    }

    #[test]
    fn test_existing_store_values_survive_mount() {
        let mut store = FormValues::new();
        store.set("host", json!("kept"));
        let engine = FormEngine::with_store(
            store,
            params(),
            [("host".to_string(), json!("initial"))].into_iter().collect(),
            None,
        );
        assert_eq!(engine.value("host"), Some(json!("kept")));
    }
}
