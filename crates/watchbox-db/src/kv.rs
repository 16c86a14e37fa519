//! Single-key read/write over the `kv_store` table.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

/// A durable key-value slot store.
///
/// Each `set` replaces the whole value under one key atomically.
pub trait KeyValueStorage {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage read fails.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage write fails.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl KeyValueStorage for Connection {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("failed to read key {key}"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )
        .with_context(|| format!("failed to write key {key}"))?;
        Ok(())
    }
}
