//! Main AguaClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::Error;
use crate::session::Session;

/// The main client for the billing backend.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks. It reads the bearer token from its [`Session`] on every
/// request and clears that session when the backend answers 401.
///
/// # Example
///
/// ```ignore
/// use agua_lib::AguaClient;
/// use agua_lib::session::{MemoryStore, Session};
///
/// let session = Session::restore(Arc::new(MemoryStore::new())).await?;
/// let client = AguaClient::builder()
///     .url("https://agua.example.gob.mx/api")
///     .session(session)
///     .build()?;
///
/// client.login("cajero1", "secreto").await?;
/// ```
#[derive(Clone)]
pub struct AguaClient {
    pub(crate) inner: Arc<AguaClientInner>,
}

pub(crate) struct AguaClientInner {
    pub(crate) base_url: Url,
    pub(crate) session: Session,
    pub(crate) http_client: Client,
    pub(crate) timeout: Option<Duration>,
}

impl AguaClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> AguaClientBuilder<Missing, Missing> {
        AguaClientBuilder::new()
    }

    /// Returns the base URL of the backend.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Returns the session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Builds the absolute URL of `path` under the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for AguaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AguaClient")
            .field("base_url", &self.base_url())
            .field("session", &self.inner.session)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`AguaClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The backend base URL
/// - `session` - The [`Session`] that owns the bearer token
pub struct AguaClientBuilder<U, S> {
    url: U,
    session: S,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl AguaClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            session: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for AguaClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> AguaClientBuilder<Missing, S> {
    /// Sets the backend base URL, e.g. `https://agua.example.gob.mx/api`.
    pub fn url(self, url: impl Into<String>) -> AguaClientBuilder<Set<String>, S> {
        AguaClientBuilder {
            url: Set(url.into()),
            session: self.session,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> AguaClientBuilder<U, Missing> {
    /// Sets the session used for authentication.
    pub fn session(self, session: Session) -> AguaClientBuilder<U, Set<Session>> {
        AguaClientBuilder {
            url: self.url,
            session: Set(session),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, S> AguaClientBuilder<U, S> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl AguaClientBuilder<Set<String>, Set<Session>> {
    /// Builds the [`AguaClient`].
    ///
    /// Fails if the URL is not an absolute http(s) URL or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<AguaClient, Error> {
        let base_url = Url::parse(&self.url.0)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.url.0, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                self.url.0,
                base_url.scheme()
            )));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(AguaClient {
            inner: Arc::new(AguaClientInner {
                base_url,
                session: self.session.0,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
