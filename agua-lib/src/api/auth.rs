//! Login and logout

use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;

use super::OnUnauthorized;
use crate::AguaClient;
use crate::error::Error;
use crate::model::Usuario;
use crate::session::SessionData;
use crate::session::SessionState;

#[derive(Serialize)]
struct LoginRequest<'a> {
    usuario: &'a str,
    password: &'a str,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated operator.
    #[serde(default)]
    pub usuario: Option<Usuario>,
}

impl AguaClient {
    /// Authenticates and stores the issued token in the session.
    ///
    /// Blank credentials are rejected locally with [`Error::Validation`];
    /// credentials the backend refuses yield [`Error::InvalidCredentials`]
    /// and leave the current session untouched. The returned user is `None`
    /// when the backend does not include one.
    pub async fn login(&self, usuario: &str, password: &str) -> Result<Option<Usuario>, Error> {
        let mut missing = Vec::new();
        if usuario.trim().is_empty() {
            missing.push(crate::error::FieldValidationError::new(
                "usuario",
                "El usuario es requerido",
            ));
        }
        if password.is_empty() {
            missing.push(crate::error::FieldValidationError::new(
                "password",
                "La contraseña es requerida",
            ));
        }
        if !missing.is_empty() {
            return Err(Error::Validation(missing));
        }

        let response = self
            .dispatch(
                Method::POST,
                "auth/login",
                &[],
                Some(&LoginRequest {
                    usuario: usuario.trim(),
                    password,
                }),
                OnUnauthorized::RejectCredentials,
            )
            .await
            .inspect_err(|e| {
                if matches!(e, Error::InvalidCredentials) {
                    log::warn!("Login refused for {}", usuario.trim());
                }
            })?;
        let response: LoginResponse = self.decode(response).await?;

        if response.token.is_empty() {
            return Err(Error::parse("login response carried an empty token"));
        }

        log::info!("Logged in as {}", usuario.trim());
        let usuario = response.usuario.clone();
        self.inner
            .session
            .begin(SessionData {
                token: response.token,
                usuario: response.usuario,
            })
            .await?;
        Ok(usuario)
    }

    /// Ends the session.
    ///
    /// The backend is notified on a best-effort basis; the local session is
    /// cleared regardless of the outcome.
    pub async fn logout(&self) -> Result<(), Error> {
        if self.inner.session.is_authenticated() {
            if let Err(e) = self
                .request(Method::POST, "auth/logout", &[], None::<&()>)
                .await
            {
                log::warn!("Logout request failed: {}", e);
            }
        }
        self.inner.session.end(SessionState::LoggedOut).await
    }
}
