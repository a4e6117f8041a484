//! SessionStore trait and the in-memory implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Error;

/// Persistent key-value storage backing a [`Session`](super::Session).
///
/// Implementations only deal in strings; the session decides what goes under
/// which key. The console ships a SQLite-backed implementation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), Error>;
}

/// Volatile store, used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.values
            .read()
            .map(|guard| guard.get(key).cloned())
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.values
            .write()
            .map(|mut guard| {
                guard.insert(key.to_string(), value.to_string());
            })
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.values
            .write()
            .map(|mut guard| {
                guard.remove(key);
            })
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}
