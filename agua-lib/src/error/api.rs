//! Client error types

use std::time::Duration;

use super::FieldValidationError;

/// Broad category of an [`Error`], used by callers to pick how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response (DNS, refused connection, timeout).
    Network,
    /// The backend answered with a non-success status.
    Server,
    /// The backend rejected the submitted fields.
    Validation,
    /// The session token is missing or expired.
    Unauthorized,
    /// The request was rejected before being sent.
    Client,
    /// The request was cancelled before it completed.
    Cancelled,
    /// The persistent session storage failed.
    Storage,
}

/// Errors returned by every backend-calling function.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// HTTP error response from the backend.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Field-keyed validation errors reported by the backend.
    #[error("Validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldValidationError>),

    /// Missing or expired session.
    #[error("Session expired or missing")]
    Unauthorized,

    /// The backend refused the login credentials.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Invalid input detected before sending the request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the backend response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// The request was cancelled through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// Session storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

fn format_fields(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::Timeout(_) => ErrorKind::Network,
            Self::Http { .. } | Self::Parse { .. } => ErrorKind::Server,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unauthorized | Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::InvalidRequest(_) | Self::InvalidUrl(_) => ErrorKind::Client,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Unauthorized | Self::InvalidCredentials => Some(401),
            Self::Validation(_) => Some(422),
            _ => None,
        }
    }

    /// Returns the field errors if the backend rejected the input.
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Error::http(500, "boom").kind(), ErrorKind::Server);
        assert_eq!(Error::Unauthorized.kind(), ErrorKind::Unauthorized);
        assert_eq!(Error::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(Error::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            Error::InvalidRequest("desde > hasta".into()).kind(),
            ErrorKind::Client
        );
        assert_eq!(Error::Validation(vec![]).kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_validation_display() {
        let err = Error::Validation(vec![
            FieldValidationError::new("nombre", "requerido"),
            FieldValidationError::new("email", "inválido"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: nombre: requerido; email: inválido"
        );
        assert_eq!(err.field_errors().len(), 2);
        assert_eq!(err.status_code(), Some(422));
    }
}
