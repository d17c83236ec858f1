//! Error types for the form engine

use thiserror::Error;

/// Errors raised while building or driving a form
#[derive(Debug, Error)]
pub enum FormError {
    /// A change event named a field that is not part of the form
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A change event targeted a field whose value is a constant
    #[error("Field {0} holds a constant value and cannot be edited")]
    ConstantField(String),

    /// The input does not belong to the control rendering the field
    #[error("Input for {field} does not match its {control} control")]
    InputMismatch { field: String, control: &'static str },

    /// A descriptor declared more than one constant source
    #[error("Parameter {0} declares both a literal and a template constant")]
    ConflictingConstant(String),

    /// A constant template failed to compile
    #[error("Invalid constant template for {id}: {reason}")]
    Template { id: String, reason: String },
}

/// Result type for form operations
pub type FormResult<T> = Result<T, FormError>;
