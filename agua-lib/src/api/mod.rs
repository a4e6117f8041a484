//! Backend operations
//!
//! Every operation is an inherent async method on [`AguaClient`] returning
//! `Result<T, Error>`. Fetches that feed a data table also come in a
//! `*_cancellable` flavor taking a [`CancellationToken`].

mod auth;
mod corte;
mod crud;
mod cuentas;

pub use auth::LoginResponse;

use std::future::Future;

use reqwest::Method;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::AguaClient;
use crate::error::Error;
use crate::error::parse_validation_body;
use crate::session::SessionState;

/// Collection payload: either a bare array or `{"data": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Single-record payload: either the record or `{"data": {...}}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemBody<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemBody<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// What a 401 response means for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnUnauthorized {
    /// The bearer token was refused; an active session expires.
    ExpireSession,
    /// The submitted credentials were refused; the session is left alone.
    RejectCredentials,
}

/// Races `fut` against `cancel`, yielding [`Error::Cancelled`] if the token fires first.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}

impl AguaClient {
    /// Sends a request and maps non-success statuses to [`Error`].
    ///
    /// This is the low-level request method used by all operations. A 401
    /// response ends an active session before the error is returned.
    pub(crate) async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response, Error> {
        self.dispatch(method, path, query, body, OnUnauthorized::ExpireSession)
            .await
    }

    pub(crate) async fn dispatch<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        on_unauthorized: OnUnauthorized,
    ) -> Result<reqwest::Response, Error> {
        let url = self.endpoint(path);
        log::debug!("{} {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method, &url)
            .header(reqwest::header::ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.inner.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.map_transport(e))?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => match on_unauthorized {
                OnUnauthorized::RejectCredentials => Err(Error::InvalidCredentials),
                OnUnauthorized::ExpireSession => {
                    if self.inner.session.is_authenticated() {
                        log::warn!("Backend rejected the session token, logging out");
                        if let Err(e) = self.inner.session.end(SessionState::Expired).await {
                            log::warn!("Failed to clear stored session: {}", e);
                        }
                    }
                    Err(Error::Unauthorized)
                }
            },
            StatusCode::UNPROCESSABLE_ENTITY => match parse_validation_body(&body) {
                Some(errors) => Err(Error::Validation(errors)),
                None => Err(Error::http(status.as_u16(), message_of(&body))),
            },
            _ => Err(Error::http(status.as_u16(), message_of(&body))),
        }
    }

    /// Sends a request and decodes a JSON response body.
    pub(crate) async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method, path, query, body).await?;
        self.decode(response).await
    }

    pub(crate) async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, Error> {
        let text = response.text().await.map_err(|e| self.map_transport(e))?;
        serde_json::from_str(&text).map_err(|e| Error::parse_with_body(e.to_string(), text))
    }

    /// Fetches a collection, accepting either payload shape.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let body: ListBody<T> = self
            .request_json(Method::GET, path, query, None::<&()>)
            .await?;
        Ok(body.into_vec())
    }

    /// Sends `body` and decodes a single record, accepting either payload shape.
    pub(crate) async fn send_item<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body: ItemBody<T> = self.request_json(method, path, &[], body).await?;
        Ok(body.into_inner())
    }

    fn map_transport(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout(self.inner.timeout.unwrap_or_default())
        } else {
            Error::Network(error)
        }
    }
}

/// Extracts `message` from a JSON error body, falling back to the raw text.
fn message_of(body: &str) -> String {
    serde_json::from_str::<MessageBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_body_shapes() {
        let bare: ListBody<i32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);

        let wrapped: ListBody<i32> = serde_json::from_str(r#"{"data": [3]}"#).unwrap();
        assert_eq!(wrapped.into_vec(), vec![3]);
    }

    #[test]
    fn test_message_of() {
        assert_eq!(message_of(r#"{"message": "No encontrado"}"#), "No encontrado");
        assert_eq!(message_of("  Internal error \n"), "Internal error");
    }

    #[tokio::test]
    async fn test_cancellable_prefers_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let result = cancellable(&token, async { Ok::<_, Error>(1) }).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
