//! SQLite settings backend.
//!
//! The console keeps a handful of keys (the session token and user, the last
//! table filter), so the whole table is loaded when the database opens and
//! reads never touch the disk. Writes go to SQLite first and reach the cache
//! only once they are stored.

use std::path::Path;

use async_sqlite::{Client, JournalMode};
use async_trait::async_trait;
use dashmap::DashMap;

use super::{SettingsBackend, SettingsError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Console preferences in one SQLite table, mirrored in a DashMap.
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Opens (or creates) the database at `path` and loads every stored key.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let client = async_sqlite::ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;

        let rows = client
            .conn(|conn| {
                conn.execute(SCHEMA, [])?;
                let mut stmt = conn.prepare("SELECT key, value FROM preferences")?;
                let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?)))?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await?;
        log::debug!("Loaded {} preferences from {}", rows.len(), path.display());

        Ok(Self {
            client,
            cache: rows.into_iter().collect(),
        })
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.cache.get(key).map(|value| value.clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        if self.cache.get(key).is_some_and(|current| *current == value) {
            return Ok(());
        }

        let row = (key.to_string(), value.clone());
        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE
                     SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
                    rusqlite::params![row.0, row.1],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        if !self.cache.contains_key(key) {
            return Ok(());
        }

        let owned = key.to_string();
        self.client
            .conn(move |conn| conn.execute("DELETE FROM preferences WHERE key = ?1", [owned]))
            .await?;

        self.cache.remove(key);
        Ok(())
    }
}
