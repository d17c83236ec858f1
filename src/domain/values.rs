//! Aggregated form values and the form-state container seam

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::path::PropertyPath;

/// Flat mapping from field identifier to its current value.
///
/// Identifiers may be dotted or bracketed (`source.hosts[0]`); [`marshal`]
/// nests them into a plain object.
///
/// [`marshal`]: FormValues::marshal
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, Value>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.0.get(id)
    }

    /// Look up `id` as a flat key first, then as a path into the marshalled
    /// object. Initial values handed in by callers are often nested.
    pub fn lookup(&self, id: &str) -> Option<Value> {
        if let Some(v) = self.0.get(id) {
            return Some(v.clone());
        }
        PropertyPath::parse(id).lookup(&self.marshal()).cloned()
    }

    pub fn set(&mut self, id: impl Into<String>, value: Value) {
        self.0.insert(id.into(), value);
    }

    /// Merge `other` into self; keys in `other` win
    pub fn merge(&mut self, other: FormValues) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Nest dotted/bracketed keys into a plain object
    pub fn marshal(&self) -> Value {
        let mut root = Value::Object(Map::new());
        for (key, value) in &self.0 {
            PropertyPath::parse(key).insert(&mut root, value.clone());
        }
        root
    }
}

impl FromIterator<(String, Value)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Map<String, Value>> for FormValues {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// The form-state container the engine reads and writes.
pub trait FormStore {
    /// Snapshot of every field value
    fn fields_value(&self) -> FormValues;

    /// Current value of one field
    fn field_value(&self, id: &str) -> Option<Value>;

    /// Merge `values` into the store
    fn set_fields_value(&mut self, values: FormValues);
}

impl FormStore for FormValues {
    fn fields_value(&self) -> FormValues {
        self.clone()
    }

    fn field_value(&self, id: &str) -> Option<Value> {
        self.get(id).cloned()
    }

    fn set_fields_value(&mut self, values: FormValues) {
        self.merge(values);
    }
}

/// Loose truthiness used when picking initial values: null, false, zero,
/// NaN and the empty string are falsy; arrays and objects never are.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
