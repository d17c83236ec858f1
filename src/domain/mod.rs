//! Core form types: parameter descriptors, field paths and aggregated values

pub mod parameter;
pub mod path;
pub mod values;

pub use parameter::*;
pub use path::{PathSegment, PropertyPath};
pub use values::{is_truthy, FormStore, FormValues};
