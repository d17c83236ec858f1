use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::{FormSettings, Settings};
use crate::domain::{Constant, ParameterConfig, ParameterType};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_form(&settings.form) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_parameters(&settings.parameters) {
            errors.extend(e);
        }

        Self::warn_unmatched_initial_values(settings);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_form(form: &FormSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if form.touch_debounce_ms == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "form.touch_debounce_ms".to_string(),
                reason: "Debounce window must be greater than 0".to_string(),
            });
        }

        if form.parameters_dir.trim().is_empty() {
            errors.push(ValidationError::MissingField("form.parameters_dir".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_parameters(parameters: &[ParameterConfig]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_ids = HashMap::new();

        for (idx, param) in parameters.iter().enumerate() {
            if param.id.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("parameters[{}].id", idx)));
            } else if let Some(prev_idx) = seen_ids.insert(&param.id, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Parameter id '{}' appears at indices {} and {}",
                    param.id, prev_idx, idx
                )));
            }

            if param.display_name.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "parameters[{}].display_name",
                    idx
                )));
            }

            if let ParameterType::Selection { options, max_options } = &param.param_type {
                errors.extend(Self::validate_selection(idx, param, options, *max_options));
            }

            match (&param.constant, &param.constant_template) {
                (Some(_), Some(_)) => errors.push(ValidationError::InvalidValue {
                    field: format!("parameters[{}]", idx),
                    reason: "Either 'constant' or 'constant_template' may be set, not both".to_string(),
                }),
                (None, Some(template)) => {
                    if let Err(e) = Constant::template(&param.id, template) {
                        errors.push(ValidationError::InvalidValue {
                            field: format!("parameters[{}].constant_template", idx),
                            reason: e.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_selection(
        idx: usize,
        param: &ParameterConfig,
        options: &[crate::domain::SelectOption],
        max_options: usize,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if options.is_empty() {
            errors.push(ValidationError::InvalidValue {
                field: format!("parameters[{}].type.options", idx),
                reason: "Selection needs at least one option".to_string(),
            });
        }

        if max_options == 0 {
            errors.push(ValidationError::InvalidValue {
                field: format!("parameters[{}].type.max_options", idx),
                reason: "max_options must be greater than 0".to_string(),
            });
        }

        let known = |id: &str| options.iter().any(|o| o.id == id);
        let unknown_default = match &param.default_value {
            Some(Value::String(id)) => !known(id),
            Some(Value::Array(ids)) => ids.iter().any(|v| v.as_str().map_or(true, |id| !known(id))),
            Some(Value::Null) | None => false,
            Some(_) => true,
        };
        if unknown_default {
            errors.push(ValidationError::InvalidValue {
                field: format!("parameters[{}].default_value", idx),
                reason: "Default must be one of the selection option ids".to_string(),
            });
        }

        errors
    }

    fn warn_unmatched_initial_values(settings: &Settings) {
        for (id, _) in settings.initial_values.iter() {
            // nested initial values match by path prefix in either direction
            let matched = settings.parameters.iter().any(|p| {
                p.id == *id || p.id.starts_with(&format!("{}.", id)) || id.starts_with(&format!("{}.", p.id))
            });
            if !matched {
                tracing::warn!("Initial value '{}' does not match any parameter", id);
            }
        }
    }
}
