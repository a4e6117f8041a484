//! Form errors.

use thiserror::Error;

/// Misuse of the form API. Validation failures are not errors; they come
/// back as [`ValidationErrors`](super::ValidationErrors).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} is not a {expected} field")]
    WrongKind {
        field: String,
        expected: &'static str,
    },

    #[error("Form state lock poisoned")]
    Poisoned,
}
