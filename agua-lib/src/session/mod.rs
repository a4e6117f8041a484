//! Session context
//!
//! The session is the only place the bearer token lives. It is created once at
//! startup from persistent storage, handed to the [`AguaClient`](crate::AguaClient)
//! and to anything that needs the current user, and written only by the login
//! flow, the logout flow and the 401 interceptor.
//!
//! # Example
//!
//! ```ignore
//! let session = Session::restore(Arc::new(MemoryStore::new())).await?;
//! let mut state = session.subscribe();
//!
//! tokio::spawn(async move {
//!     while state.changed().await.is_ok() {
//!         if *state.borrow() == SessionState::Expired {
//!             // show the login prompt again
//!         }
//!     }
//! });
//! ```

mod store;

pub use store::MemoryStore;
pub use store::SessionStore;

use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use crate::error::Error;
use crate::model::Usuario;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the logged-in user, JSON-encoded.
pub const USER_KEY: &str = "usuario";

/// Credentials of an authenticated operator.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    /// Bearer token attached to every request.
    pub token: String,
    /// The authenticated user, when the backend returned one.
    pub usuario: Option<Usuario>,
}

/// Observable lifecycle of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token; the operator must log in.
    LoggedOut,
    /// A token is present.
    Active,
    /// The backend rejected the token; storage has been cleared.
    Expired,
}

struct SessionInner {
    data: RwLock<Option<SessionData>>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<SessionState>,
}

/// Shared session context. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("usuario", &self.usuario().map(|u| u.usuario))
            .finish()
    }
}

impl Session {
    /// Creates a logged-out session over `store` without reading it.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(SessionState::LoggedOut);
        Self {
            inner: Arc::new(SessionInner {
                data: RwLock::new(None),
                store,
                state,
            }),
        }
    }

    /// Creates a session and loads any token persisted in `store`.
    ///
    /// Storage is read only here; later external changes to it are not observed.
    pub async fn restore(store: Arc<dyn SessionStore>) -> Result<Self, Error> {
        let session = Self::new(store);
        let token = session.inner.store.get(TOKEN_KEY).await?;

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let usuario = match session.inner.store.get(USER_KEY).await? {
                Some(raw) => match serde_json::from_str::<Usuario>(&raw) {
                    Ok(usuario) => Some(usuario),
                    Err(e) => {
                        log::warn!("Ignoring unreadable stored user: {}", e);
                        None
                    }
                },
                None => None,
            };
            session.replace(Some(SessionData { token, usuario }));
            session.inner.state.send_replace(SessionState::Active);
            log::debug!("Restored session from storage");
        }

        Ok(session)
    }

    /// Returns the current bearer token.
    pub fn token(&self) -> Option<String> {
        self.inner
            .data
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|d| d.token.clone()))
    }

    /// Returns the authenticated user.
    pub fn usuario(&self) -> Option<Usuario> {
        self.inner
            .data
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().and_then(|d| d.usuario.clone()))
    }

    /// Returns `true` if a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Subscribes to lifecycle changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Stores a freshly issued token. Called by the login flow.
    pub(crate) async fn begin(&self, data: SessionData) -> Result<(), Error> {
        self.inner.store.set(TOKEN_KEY, &data.token).await?;
        match &data.usuario {
            Some(usuario) => {
                let raw = serde_json::to_string(usuario)
                    .map_err(|e| Error::Storage(e.to_string()))?;
                self.inner.store.set(USER_KEY, &raw).await?;
            }
            None => self.inner.store.delete(USER_KEY).await?,
        }
        self.replace(Some(data));
        self.inner.state.send_replace(SessionState::Active);
        Ok(())
    }

    /// Drops the token from memory and storage.
    ///
    /// The in-memory state is cleared even when storage fails, so a broken
    /// store can never keep a rejected token alive.
    pub(crate) async fn end(&self, next: SessionState) -> Result<(), Error> {
        self.replace(None);
        self.inner.state.send_replace(next);
        self.inner.store.delete(TOKEN_KEY).await?;
        self.inner.store.delete(USER_KEY).await
    }

    fn replace(&self, data: Option<SessionData>) {
        if let Ok(mut guard) = self.inner.data.write() {
            *guard = data;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rol;

    fn usuario() -> Usuario {
        Usuario {
            id: 7,
            nombre: "Lucía Ramos".to_string(),
            usuario: "lramos".to_string(),
            rol: Rol::Cajero,
        }
    }

    #[tokio::test]
    async fn test_restore_empty_store() {
        let session = Session::restore(Arc::new(MemoryStore::new())).await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.state(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_restore_reads_token_and_user() {
        let raw = serde_json::to_string(&usuario()).unwrap();
        let store = MemoryStore::with_entries([(TOKEN_KEY, "abc"), (USER_KEY, raw.as_str())]);
        let session = Session::restore(Arc::new(store)).await.unwrap();

        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(session.usuario(), Some(usuario()));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[tokio::test]
    async fn test_restore_ignores_corrupt_user() {
        let store = MemoryStore::with_entries([(TOKEN_KEY, "abc"), (USER_KEY, "{oops")]);
        let session = Session::restore(Arc::new(store)).await.unwrap();

        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(session.usuario(), None);
    }

    #[tokio::test]
    async fn test_begin_and_end_write_through() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone());
        let mut rx = session.subscribe();

        session
            .begin(SessionData {
                token: "t1".to_string(),
                usuario: Some(usuario()),
            })
            .await
            .unwrap();
        assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("t1"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::Active);

        session.end(SessionState::Expired).await.unwrap();
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(store.get(USER_KEY).await.unwrap(), None);
        assert_eq!(session.token(), None);
        assert_eq!(*rx.borrow_and_update(), SessionState::Expired);
    }
}
