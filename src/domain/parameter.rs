//! Parameter descriptors: the schema entries a form is built from

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tera::{Context, Tera};

use crate::error::{FormError, FormResult};

// ============================================================================
// Parameter Type
// ============================================================================

/// One option of a selection parameter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub display_name: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Type descriptor of a parameter, tagged by `type_name`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type_name")]
pub enum ParameterType {
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "selection")]
    Selection {
        options: Vec<SelectOption>,
        #[serde(default = "default_max_options")]
        max_options: usize,
    },
    #[serde(rename = "array/string")]
    ArrayOfString,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "boolean")]
    Boolean,
    #[default]
    #[serde(rename = "string")]
    String,
    #[serde(rename = "isoUtcDate")]
    IsoUtcDate,
    /// Any tag this build does not know; rendered as a plain text input
    #[serde(other, rename = "unknown")]
    Unknown,
}

fn default_max_options() -> usize {
    1
}

impl ParameterType {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterType::Password => "password",
            ParameterType::Int => "int",
            ParameterType::Selection { .. } => "selection",
            ParameterType::ArrayOfString => "array/string",
            ParameterType::Json => "json",
            ParameterType::Boolean => "boolean",
            ParameterType::String => "string",
            ParameterType::IsoUtcDate => "isoUtcDate",
            ParameterType::Unknown => "unknown",
        }
    }

    /// Single-choice selection over `options`
    pub fn selection(options: Vec<SelectOption>) -> Self {
        ParameterType::Selection {
            options,
            max_options: 1,
        }
    }

    /// Multi-choice selection allowing up to `max_options` ids
    pub fn multi_selection(options: Vec<SelectOption>, max_options: usize) -> Self {
        ParameterType::Selection {
            options,
            max_options,
        }
    }
}

// ============================================================================
// Constant
// ============================================================================

/// Function computing a constant from the marshalled form values.
/// `None` means the constant is undefined for the current values.
pub type ConstantFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// A value derived from other fields that overrides user input
#[derive(Clone)]
pub enum Constant {
    Literal(Value),
    Computed(ConstantFn),
}

impl Constant {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Constant::Computed(Arc::new(f))
    }

    /// Resolve against the marshalled (nested) aggregated values
    pub fn resolve(&self, aggregated: &Value) -> Option<Value> {
        match self {
            Constant::Literal(value) => Some(value.clone()),
            Constant::Computed(f) => f(aggregated),
        }
    }

    /// Compile a Tera template into a computed constant.
    ///
    /// The template renders against the marshalled values. A blank render or
    /// a render error (typically a variable that is not set yet) leaves the
    /// constant undefined.
    pub fn template(id: &str, template: &str) -> FormResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(id, template)
            .map_err(|e| FormError::Template {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        let tera = Arc::new(tera);
        let name = id.to_string();
        Ok(Constant::computed(move |values| {
            let context = match Context::from_value(values.clone()) {
                Ok(context) => context,
                Err(e) => {
                    tracing::warn!("Cannot build template context for {}: {}", name, e);
                    return None;
                }
            };
            match tera.render(&name, &context) {
                Ok(rendered) => {
                    let rendered = rendered.trim();
                    (!rendered.is_empty()).then(|| Value::String(rendered.to_string()))
                }
                Err(e) => {
                    tracing::debug!("Constant template for {} is undefined: {}", name, e);
                    None
                }
            }
        }))
    }
}

impl fmt::Debug for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Constant::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// ============================================================================
// Parameter
// ============================================================================

/// Schema entry describing one form field
#[derive(Clone, Debug)]
pub struct Parameter {
    pub id: String,
    pub display_name: String,
    pub documentation: Option<String>,
    pub param_type: ParameterType,
    pub default_value: Option<Value>,
    pub constant: Option<Constant>,
    pub required: bool,
}

impl Parameter {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, param_type: ParameterType) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            documentation: None,
            param_type,
            default_value: None,
            constant: None,
            required: false,
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_constant(mut self, constant: Constant) -> Self {
        self.constant = Some(constant);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Serializable descriptor as written in JSON, YAML or TOML files
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterConfig {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(rename = "type", default)]
    pub param_type: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Literal constant value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<Value>,
    /// Tera template computing the constant from the other fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant_template: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl TryFrom<ParameterConfig> for Parameter {
    type Error = FormError;

    fn try_from(config: ParameterConfig) -> Result<Self, Self::Error> {
        let constant = match (config.constant, config.constant_template) {
            (Some(_), Some(_)) => return Err(FormError::ConflictingConstant(config.id)),
            (Some(value), None) => Some(Constant::Literal(value)),
            (None, Some(template)) => Some(Constant::template(&config.id, &template)?),
            (None, None) => None,
        };

        Ok(Parameter {
            id: config.id,
            display_name: config.display_name,
            documentation: config.documentation,
            param_type: config.param_type,
            default_value: config.default_value,
            constant,
            required: config.required,
        })
    }
}

/// Convert a list of descriptors, keeping their order
pub fn parameters_from_configs(configs: Vec<ParameterConfig>) -> FormResult<Vec<Parameter>> {
    configs.into_iter().map(Parameter::try_from).collect()
}
