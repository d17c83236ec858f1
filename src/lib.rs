//! # Configurator - schema-driven configurable fields
//!
//! Builds input forms from a list of parameter descriptors: every descriptor
//! becomes a bound control, initial values are resolved from caller input,
//! defaults and constants, constant fields are hidden and kept in sync with
//! the fields they derive from, and required/date fields are validated.
//!
//! ## Quick Start
//!
//! ```rust
//! use configurator::domain::{FormValues, Parameter, ParameterType};
//! use configurator::form::{FieldInput, FormEngine};
//!
//! let params = vec![
//!     Parameter::new("port", "Port", ParameterType::Int).required(),
//! ];
//! let mut engine = FormEngine::new(params, FormValues::new(), None);
//! engine.handle_change("port", FieldInput::Text("54a32".into())).unwrap();
//! assert_eq!(engine.value("port"), Some(serde_json::json!("5432")));
//! ```
//!
//! ## Layout
//!
//! - **domain**: descriptors, field paths, aggregated values, the store seam
//! - **form**: control dispatch, rows, rules and the engine
//! - **config**, **cli**, **debounce**, **evaluate** (feature `cli`): the command
//!   line front end

pub mod domain;
pub mod error;
pub mod form;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod debounce;
#[cfg(feature = "cli")]
pub mod evaluate;

pub use error::{FormError, FormResult};
