//! Configurable fields form: control dispatch, row composition, validation
//! and the engine tying them to a form store

pub mod control;
pub mod engine;
pub mod initial;
pub mod row;
pub mod rules;

pub use control::{sanitize_int, ControlKind, FieldInput};
pub use engine::{ChangeOutcome, FormEngine};
pub use initial::resolve_initial_value;
pub use row::{compose_row, compose_rows, FieldRow, HIDDEN_CLASS};
pub use rules::{is_iso_date, required_message, FieldError, Rule};

/// Idle window coalescing "field touched" notifications
pub const TOUCH_DEBOUNCE_MS: u64 = 1000;
