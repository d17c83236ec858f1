//! Control dispatch: which input renders a parameter type and how its
//! change events turn into committed values

use serde_json::Value;

use crate::domain::{ParameterType, SelectOption};
use crate::error::{FormError, FormResult};

/// Input control rendering one field
#[derive(Clone, Debug, PartialEq)]
pub enum ControlKind {
    /// Masked text input with a visibility toggle
    MaskedText,
    /// Text input keeping digits only
    DigitsText,
    /// Single or multiple select
    Select {
        options: Vec<SelectOption>,
        multiple: bool,
    },
    /// Editable list of strings
    EditableList,
    /// Lazily mounted JSON code editor
    JsonEditor,
    /// Toggle switch
    Toggle,
    /// Plain text input
    Text,
}

/// Raw payload of a change event, as produced by the control
#[derive(Clone, Debug, PartialEq)]
pub enum FieldInput {
    Text(String),
    Selected(Vec<String>),
    Toggled(bool),
    List(Vec<String>),
    Json(String),
}

impl ControlKind {
    /// Dispatch table from type tag to control
    pub fn for_type(param_type: &ParameterType) -> Self {
        match param_type {
            ParameterType::Password => ControlKind::MaskedText,
            ParameterType::Int => ControlKind::DigitsText,
            ParameterType::Selection { options, max_options } => ControlKind::Select {
                options: options.clone(),
                multiple: *max_options > 1,
            },
            ParameterType::ArrayOfString => ControlKind::EditableList,
            ParameterType::Json => ControlKind::JsonEditor,
            ParameterType::Boolean => ControlKind::Toggle,
            ParameterType::String | ParameterType::IsoUtcDate | ParameterType::Unknown => ControlKind::Text,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ControlKind::MaskedText => "password",
            ControlKind::DigitsText => "digits",
            ControlKind::Select { multiple: true, .. } => "multi-select",
            ControlKind::Select { .. } => "select",
            ControlKind::EditableList => "list",
            ControlKind::JsonEditor => "json",
            ControlKind::Toggle => "switch",
            ControlKind::Text => "text",
        }
    }

    /// Convert a change event into the value committed to the form state
    pub fn commit(&self, field: &str, input: FieldInput) -> FormResult<Value> {
        let value = match (self, input) {
            (ControlKind::MaskedText | ControlKind::Text, FieldInput::Text(text)) => Value::String(text),
            (ControlKind::DigitsText, FieldInput::Text(text)) => Value::String(sanitize_int(&text)),
            (ControlKind::Select { multiple: true, .. }, FieldInput::Selected(ids)) => {
                Value::Array(ids.into_iter().map(Value::String).collect())
            }
            (ControlKind::Select { multiple: false, .. }, FieldInput::Selected(ids)) => {
                // cleared selection commits null
                ids.into_iter().next().map(Value::String).unwrap_or(Value::Null)
            }
            (ControlKind::EditableList, FieldInput::List(items)) => {
                Value::Array(items.into_iter().map(Value::String).collect())
            }
            (ControlKind::JsonEditor, FieldInput::Json(text)) => Value::String(text),
            (ControlKind::Toggle, FieldInput::Toggled(checked)) => Value::Bool(checked),
            _ => {
                return Err(FormError::InputMismatch {
                    field: field.to_string(),
                    control: self.name(),
                })
            }
        };
        Ok(value)
    }

    /// Build the input a control would emit for a textual entry such as a
    /// command line `id=value` assignment
    pub fn input_from_text(&self, raw: &str) -> FieldInput {
        let split = || {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        };

        match self {
            ControlKind::Select { .. } => FieldInput::Selected(split()),
            ControlKind::EditableList => FieldInput::List(split()),
            ControlKind::JsonEditor => FieldInput::Json(raw.to_string()),
            ControlKind::Toggle => FieldInput::Toggled(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )),
            ControlKind::MaskedText | ControlKind::DigitsText | ControlKind::Text => {
                FieldInput::Text(raw.to_string())
            }
        }
    }
}

/// Drop every non-digit character, keeping typing responsive instead of
/// rejecting the whole entry
pub fn sanitize_int(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}
