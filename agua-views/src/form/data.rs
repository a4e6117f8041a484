//! Form data.

use std::collections::BTreeMap;

use serde::Serialize;

use super::field::{Field, FieldValue};

/// Field name to current value. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, FieldValue>);

impl FormData {
    /// Data holding every field's declared default.
    pub fn from_defaults(fields: &[Field]) -> Self {
        Self(
            fields
                .iter()
                .map(|f| (f.name.clone(), f.default.clone()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// The value as text; missing fields read as empty.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The data as a JSON object, ready to deserialize into a model.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| {
                    let value = match v {
                        FieldValue::Text(text) => serde_json::Value::from(text.as_str()),
                        FieldValue::Number(n) => serde_json::Value::from(*n),
                    };
                    (k.clone(), value)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldKind;
    use serde_json::json;

    #[test]
    fn test_defaults_and_json() {
        let fields = vec![
            Field::new("nombre", "Nombre", FieldKind::text()),
            Field::new("tarifa", "Tarifa", FieldKind::text()).default_value("domestica"),
            Field::new("lectura", "Lectura", FieldKind::number()).default_value(0.0),
        ];
        let data = FormData::from_defaults(&fields);

        assert_eq!(data.len(), 3);
        assert_eq!(data.text("tarifa"), "domestica");
        assert_eq!(data.text("missing"), "");
        assert_eq!(
            data.to_json(),
            json!({"nombre": "", "tarifa": "domestica", "lectura": 0.0})
        );
    }
}
