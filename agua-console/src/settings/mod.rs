//! Typed key-value settings, persisted in SQLite.
//!
//! The provider also backs the login session, so a restarted console picks
//! up where the operator left off.

mod backend;
mod sqlite;

pub use backend::SettingsBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use agua_lib::session::SessionStore;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Prefix of the keys written by the session.
const SESSION_PREFIX: &str = "session/";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("could not create settings directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(bincode::Error),
    #[error("deserialization error: {0}")]
    Deserialization(bincode::Error),
}

impl From<SettingsError> for agua_lib::Error {
    fn from(e: SettingsError) -> Self {
        agua_lib::Error::Storage(e.to_string())
    }
}

/// Typed settings over a [`SettingsBackend`], encoded with bincode.
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        match self.backend.get_bytes(key).await? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(SettingsError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Get a typed value, falling back to `default` when unset.
    pub async fn get_or<T: DeserializeOwned>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T, SettingsError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(SettingsError::Serialization)?;
        self.backend.set_bytes(key, bytes).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        self.backend.delete(key).await
    }
}

#[async_trait]
impl SessionStore for SettingsProvider {
    async fn get(&self, key: &str) -> Result<Option<String>, agua_lib::Error> {
        Ok(SettingsProvider::get::<String>(self, &format!("{}{}", SESSION_PREFIX, key)).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), agua_lib::Error> {
        let value = value.to_string();
        Ok(SettingsProvider::set(self, &format!("{}{}", SESSION_PREFIX, key), &value).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), agua_lib::Error> {
        Ok(SettingsProvider::delete(self, &format!("{}{}", SESSION_PREFIX, key)).await?)
    }
}
