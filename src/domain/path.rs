//! Field paths: dotted and bracketed keys such as `source.hosts[0].port`

use serde_json::{Map, Value};
use std::fmt;

/// Segment of a property path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object property access: .fieldName
    Property(String),
    /// Array index access: [0], [1], etc.
    Index(usize),
}

/// Largest array index honoured when nesting keys; a bigger bracket number
/// is read as a property name so a stray key cannot force a huge allocation
pub const MAX_INDEX: usize = 10_000;

/// Property path for nested access (e.g., "user.address.city" or "items[0].name")
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// Parse a path string into PropertyPath.
    ///
    /// A bracket holding something other than an index (`a[b]`) is read as a
    /// property name, the way quoted bracket keys behave in field names.
    pub fn parse(s: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                    let mut inner = String::new();
                    while let Some(c) = chars.next_if(|&c| c != ']') {
                        inner.push(c);
                    }
                    // consume the closing bracket
                    chars.next();

                    match inner.parse::<usize>() {
                        Ok(idx) if idx <= MAX_INDEX => segments.push(PathSegment::Index(idx)),
                        Ok(_) => {
                            tracing::warn!("Index [{}] in '{}' exceeds {}, using it as a key", inner, s, MAX_INDEX);
                            segments.push(PathSegment::Property(inner));
                        }
                        Err(_) => {
                            let key = inner.trim_matches(|c| c == '"' || c == '\'');
                            if !key.is_empty() {
                                segments.push(PathSegment::Property(key.to_string()));
                            }
                        }
                    }
                }
                _ => current.push(ch),
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::Property(current));
        }

        Self { segments }
    }

    /// Deep-get: follow the path into a JSON value
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments.iter().try_fold(root, |node, seg| match seg {
            PathSegment::Property(name) => node.get(name.as_str()),
            PathSegment::Index(idx) => node.get(*idx),
        })
    }

    /// Write `value` at this path, creating intermediate objects and arrays.
    ///
    /// An intermediate node of the wrong shape is replaced. Arrays are padded
    /// with nulls up to the requested index.
    pub fn insert(&self, root: &mut Value, value: Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            *root = value;
            return;
        };

        let mut node = root;
        for (i, seg) in parents.iter().enumerate() {
            let next_is_index = matches!(self.segments[i + 1], PathSegment::Index(_));
            node = descend(node, seg, next_is_index);
        }

        match last {
            PathSegment::Property(name) => {
                ensure_object(node).insert(name.clone(), value);
            }
            PathSegment::Index(idx) => {
                let items = ensure_array(node);
                if items.len() <= *idx {
                    items.resize(*idx + 1, Value::Null);
                }
                items[*idx] = value;
            }
        }
    }
}

fn descend<'a>(node: &'a mut Value, seg: &PathSegment, next_is_index: bool) -> &'a mut Value {
    let empty = || {
        if next_is_index {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        }
    };

    let child = match seg {
        PathSegment::Property(name) => ensure_object(node).entry(name.clone()).or_insert_with(empty),
        PathSegment::Index(idx) => {
            let items = ensure_array(node);
            if items.len() <= *idx {
                items.resize(*idx + 1, Value::Null);
            }
            &mut items[*idx]
        }
    };

    let shape_ok = if next_is_index { child.is_array() } else { child.is_object() };
    if !shape_ok {
        *child = empty();
    }
    child
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

fn ensure_array(node: &mut Value) -> &mut Vec<Value> {
    if !node.is_array() {
        *node = Value::Array(Vec::new());
    }
    match node {
        Value::Array(items) => items,
        _ => unreachable!("node was just replaced with an array"),
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Property(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Property(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_path_parse() {
        let path = PropertyPath::parse("user.address[0].city");
        assert_eq!(path.segments.len(), 4);
        assert_eq!(path.to_string(), "user.address[0].city");
    }

    #[test]
    fn test_oversized_index_becomes_key() {
        let path = PropertyPath::parse("hosts[18446744073709551615]");
        assert_eq!(
            path.segments,
            vec![
                PathSegment::Property("hosts".to_string()),
                PathSegment::Property("18446744073709551615".to_string()),
            ]
        );

        let mut root = json!({});
        path.insert(&mut root, json!("x"));
        PropertyPath::parse("big[100000000000].name").insert(&mut root, json!("y"));
        assert_eq!(
            root,
            json!({
                "hosts": { "18446744073709551615": "x" },
                "big": { "100000000000": { "name": "y" } }
            })
        );
    }

    #[test]
    fn test_index_at_limit_is_kept() {
        let path = PropertyPath::parse(&format!("a[{}]", MAX_INDEX));
        assert_eq!(path.segments[1], PathSegment::Index(MAX_INDEX));
    }

    #[test]
    fn test_parse_quoted_bracket_key() {
        let path = PropertyPath::parse("_formData['tableName']");
        assert_eq!(
            path.segments,
            vec![
                PathSegment::Property("_formData".to_string()),
                PathSegment::Property("tableName".to_string()),
            ]
        );
    }

    #[test]
    fn test_lookup_nested() {
        let root = json!({ "a": { "b": [ { "c": 7 } ] } });
        assert_eq!(PropertyPath::parse("a.b[0].c").lookup(&root), Some(&json!(7)));
        assert_eq!(PropertyPath::parse("a.x").lookup(&root), None);
        assert_eq!(PropertyPath::default().lookup(&root), Some(&root));
    }

    #[test]
    fn test_insert_creates_structure() {
        let mut root = json!({});
        PropertyPath::parse("a.list[2].name").insert(&mut root, json!("x"));
        assert_eq!(root, json!({ "a": { "list": [null, null, { "name": "x" }] } }));
    }

    #[test]
    fn test_insert_replaces_scalar_parent() {
        let mut root = json!({ "a": 1 });
        PropertyPath::parse("a.b").insert(&mut root, json!(true));
        assert_eq!(root, json!({ "a": { "b": true } }));
    }
}
