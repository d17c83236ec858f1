//! Schema-Driven Configurable Fields
//!
//! Builds a form from parameter descriptors:
//! - one control per descriptor type (password, digits, select, list, JSON, switch, text)
//! - fields with a resolved constant are hidden but keep their value bound
//! - constants follow the fields they derive from
//! - edits on any field notify the parent once per idle second

pub mod debounce;
pub mod editable_list;
pub mod fields;
pub mod form;

pub use form::*;
