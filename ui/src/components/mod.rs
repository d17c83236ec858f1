pub mod configurable_fields_form;
pub mod json_editor;
