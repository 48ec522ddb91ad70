// Durable key-value storage backed by SQLite

use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Flat store of named text entries in a single SQLite database.
///
/// Every consumer serializes its own state: the task collection lives under
/// one entry as a single JSON unit, streak scalars under one entry each.
pub struct KvStore {
    base_path: PathBuf,
    db: Connection,
}

impl KvStore {
    /// Open or create a store in the given directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let base_path = dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        let db_path = base_path.join("diddit.db");
        let db = Connection::open(&db_path)?;

        let store = Self { base_path, db };
        store.create_schema()?;
        Ok(store)
    }

    /// Get the base path of this store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT NOT NULL PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// Store a raw string value under a named entry.
    pub fn put_raw(&mut self, key: &str, value: &str) -> Result<()> {
        Self::validate_key(key)?;

        self.db.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, now_ms()],
        )?;

        Ok(())
    }

    /// Read a raw string entry. Missing entries are `None`, not an error.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Self::validate_key(key)?;

        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;

        Ok(value)
    }

    /// Remove an entry if present.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        Self::validate_key(key)?;

        self.db.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Serialize a value as JSON under a named entry.
    pub fn put_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.put_raw(key, &json)
    }

    /// Decode a JSON entry. Decode failures surface as `Error::Corrupt` so
    /// the caller can choose between masking and reporting.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Ok(Some(value)),
                Err(e) => Err(Error::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            },
            None => Ok(None),
        }
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(Error::Validation("entry key cannot be empty".to_string()));
        }
        if key.len() > 64 {
            return Err(Error::Validation(format!(
                "entry key too long: {} (max 64 chars)",
                key
            )));
        }
        if !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(Error::Validation(format!(
                "invalid entry key: {} (must be alphanumeric with _)",
                key
            )));
        }
        Ok(())
    }
}

/// Helper function for timestamps
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_millis() as i64
}
