//! Submit-time validation.

use std::collections::BTreeMap;

use super::data::FormData;
use super::field::{Field, FieldValue};

/// Message shown when a required field is blank.
pub fn required_message(label: &str) -> String {
    format!("El {} es requerido", label.to_lowercase())
}

/// Field name to error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(String, String)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Evaluates every field against `data`.
///
/// A required field that is blank gets the required message; otherwise the
/// field's validator, if any, sees the value and the whole form.
pub fn validate_fields(fields: &[Field], data: &FormData) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    let blank = FieldValue::default();

    for field in fields {
        let value = data.get(&field.name).unwrap_or(&blank);
        if field.required && value.is_blank() {
            errors.insert(&field.name, required_message(&field.label));
            continue;
        }
        if let Some(message) = field.validator.as_ref().and_then(|v| v(value, data)) {
            errors.insert(&field.name, message);
        }
    }
    errors
}

/// Reusable validator constructors.
///
/// Blank values pass every rule here; pair them with `required` when the
/// field must be filled.
pub mod validators {
    use std::sync::Arc;

    use email_address::EmailAddress;
    use regex::Regex;

    use crate::form::data::FormData;
    use crate::form::field::{FieldValue, ValidatorFn};

    pub fn email(message: impl Into<String>) -> ValidatorFn {
        let message = message.into();
        Arc::new(move |value: &FieldValue, _: &FormData| {
            let text = value.to_string();
            let text = text.trim();
            (!text.is_empty() && !EmailAddress::is_valid(text)).then(|| message.clone())
        })
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> ValidatorFn {
        let message = message.into();
        Arc::new(move |value: &FieldValue, _: &FormData| {
            let text = value.to_string();
            let len = text.trim().chars().count();
            (len > 0 && len < min).then(|| message.clone())
        })
    }

    /// Fails when the whole value does not match `pattern`.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<ValidatorFn, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        let message = message.into();
        Ok(Arc::new(move |value: &FieldValue, _: &FormData| {
            let text = value.to_string();
            let text = text.trim();
            (!text.is_empty() && !regex.is_match(text)).then(|| message.clone())
        }))
    }

    pub fn positive_number(message: impl Into<String>) -> ValidatorFn {
        let message = message.into();
        Arc::new(move |value: &FieldValue, _: &FormData| {
            if value.is_blank() {
                return None;
            }
            match value {
                FieldValue::Number(n) if *n > 0.0 => None,
                FieldValue::Text(text) if text.trim().parse::<f64>().is_ok_and(|n| n > 0.0) => {
                    None
                }
                _ => Some(message.clone()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::validators::*;
    use super::*;
    use crate::form::field::ValidatorFn;
    use crate::form::FieldKind;

    fn check(rule: &ValidatorFn, value: impl Into<FieldValue>) -> Option<String> {
        rule(&value.into(), &FormData::default())
    }

    #[test]
    fn test_required_blank_uses_lowercase_label() {
        let fields = vec![Field::new("nombre", "Nombre", FieldKind::text()).required()];
        let mut data = FormData::from_defaults(&fields);
        data.set("nombre", "   ".into());

        let errors = validate_fields(&fields, &data);
        assert_eq!(errors.get("nombre"), Some("El nombre es requerido"));
    }

    #[test]
    fn test_validator_sees_whole_form() {
        let fields = vec![
            Field::new("password", "Contraseña", FieldKind::Password),
            Field::new("confirmar", "Confirmar", FieldKind::Password).validator(|value, data| {
                (value.to_string() != data.text("password")).then(|| "No coincide".to_string())
            }),
        ];
        let mut data = FormData::from_defaults(&fields);
        data.set("password", "secreto".into());
        data.set("confirmar", "otro".into());

        let errors = validate_fields(&fields, &data);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("confirmar"), Some("No coincide"));
    }

    #[test]
    fn test_required_short_circuits_validator() {
        let fields = vec![
            Field::new("email", "Email", FieldKind::email())
                .required()
                .rule(email("Correo inválido")),
        ];
        let errors = validate_fields(&fields, &FormData::from_defaults(&fields));
        assert_eq!(errors.get("email"), Some("El email es requerido"));
    }

    #[test]
    fn test_builtin_validators() {
        let rule = email("Correo inválido");
        assert_eq!(check(&rule, "ana@ejemplo.mx"), None);
        assert_eq!(check(&rule, "ana@"), Some("Correo inválido".into()));
        assert_eq!(check(&rule, ""), None);

        let rule = min_length(3, "Muy corto");
        assert_eq!(check(&rule, "ab"), Some("Muy corto".into()));
        assert_eq!(check(&rule, "abc"), None);

        let rule = pattern(r"\d{10}", "Teléfono inválido").unwrap();
        assert_eq!(check(&rule, "4421234567"), None);
        assert_eq!(check(&rule, "44212345678"), Some("Teléfono inválido".into()));
        assert!(pattern("(", "x").is_err());

        let rule = positive_number("Debe ser mayor a cero");
        assert_eq!(check(&rule, 10.0), None);
        assert_eq!(check(&rule, "0"), Some("Debe ser mayor a cero".into()));
        assert_eq!(check(&rule, "abc"), Some("Debe ser mayor a cero".into()));
    }
}
