//! Column descriptors.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::row::display;
use crate::row::lookup;

type Render<T> = Arc<dyn Fn(&Value, &T) -> String + Send + Sync>;

/// Column configuration.
///
/// `key` is a dot-separated path into the row's serialized form. A path that
/// does not resolve renders as an empty cell.
///
/// # Examples
///
/// ```ignore
/// let columns = vec![
///     Column::new("numero_cuenta", "Cuenta"),
///     Column::new("cobrador.nombre", "Cobrador"),
///     Column::new("activo", "Estado")
///         .render(|value, _row| if value == &json!(true) { "Activo" } else { "Baja" }.into()),
/// ];
/// ```
pub struct Column<T> {
    pub key: String,
    pub label: String,
    render: Option<Render<T>>,
}

impl<T> Column<T> {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            render: None,
        }
    }

    /// Custom cell rendering. Receives `null` when the key does not resolve.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value, &T) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Text of this column for a row and its projection.
    pub fn cell(&self, row: &T, fields: &Value) -> String {
        let value = lookup(fields, &self.key);
        match &self.render {
            Some(render) => render(value.unwrap_or(&Value::Null), row),
            None => value.map(display).unwrap_or_default(),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("render", &self.render.is_some())
            .finish()
    }
}
