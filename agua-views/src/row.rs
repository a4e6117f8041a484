//! Field access on rows by dotted path.
//!
//! Rows are projected once into a [`serde_json::Value`]; columns and search
//! fields address that projection with keys like `"cobrador.nombre"`.

use serde_json::Value;

/// Something that can render the text of a field by key.
pub trait Searchable {
    /// Text of the field at `key`, or `None` when the path does not resolve.
    fn field_text(&self, key: &str) -> Option<String>;
}

/// Walks a dot-separated path. Numeric segments index into arrays.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Display text of a JSON value.
///
/// Strings are unquoted and `null` is empty; containers render as compact JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

impl Searchable for Value {
    fn field_text(&self, key: &str) -> Option<String> {
        lookup(self, key).map(display)
    }
}

/// A row together with its JSON projection.
#[derive(Debug, Clone)]
pub struct Projected<T> {
    pub row: T,
    pub fields: Value,
}

impl<T: serde::Serialize> Projected<T> {
    /// Projects `row`; rows that fail to serialize project to `null`.
    pub fn new(row: T) -> Self {
        let fields = serde_json::to_value(&row).unwrap_or_else(|e| {
            log::warn!("Row could not be projected for searching: {}", e);
            Value::Null
        });
        Self { row, fields }
    }
}

impl<T> Searchable for Projected<T> {
    fn field_text(&self, key: &str) -> Option<String> {
        self.fields.field_text(key)
    }
}
