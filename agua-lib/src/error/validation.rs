//! Server-side validation error types

use std::collections::BTreeMap;

use serde::Deserialize;

/// Error information for a specific field rejected by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable validation error message.
    pub message: String,
}

impl FieldValidationError {
    /// Creates a new field validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Messages for one field; the backend sends either a list or a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    Many(Vec<String>),
    One(String),
}

#[derive(Debug, Deserialize)]
struct ValidationBody {
    errors: BTreeMap<String, FieldMessages>,
}

/// Parses a `{"errors": {field: [msg, ...]}}` body into field errors.
///
/// Only the first message of each field is kept. Returns `None` when the body
/// does not have that shape.
pub(crate) fn parse_validation_body(body: &str) -> Option<Vec<FieldValidationError>> {
    let parsed: ValidationBody = serde_json::from_str(body).ok()?;
    let errors = parsed
        .errors
        .into_iter()
        .filter_map(|(field, messages)| {
            let message = match messages {
                FieldMessages::Many(list) => list.into_iter().next()?,
                FieldMessages::One(msg) => msg,
            };
            Some(FieldValidationError::new(field, message))
        })
        .collect();
    Some(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_messages() {
        let body = r#"{"errors": {"nombre": ["El nombre es requerido", "otro"], "email": ["Correo inválido"]}}"#;
        let errors = parse_validation_body(body).unwrap();
        assert_eq!(
            errors,
            vec![
                FieldValidationError::new("email", "Correo inválido"),
                FieldValidationError::new("nombre", "El nombre es requerido"),
            ]
        );
    }

    #[test]
    fn test_parse_single_messages() {
        let body = r#"{"errors": {"monto": "Debe ser positivo"}}"#;
        let errors = parse_validation_body(body).unwrap();
        assert_eq!(errors, vec![FieldValidationError::new("monto", "Debe ser positivo")]);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(parse_validation_body(r#"{"message": "nope"}"#).is_none());
        assert!(parse_validation_body("not json").is_none());
    }
}
