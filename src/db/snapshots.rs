//! Durable key-value storage for serialized session snapshots.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Database, DbError};

/// String-keyed durable storage consumed by the session store.
///
/// Persistence is best-effort caching, not a durability guarantee: `read`
/// swallows backend failures and reports the value as absent, while `write`
/// surfaces them so the caller can log and move on. Concurrent writers from
/// other processes are not coordinated; last write wins.
pub trait SnapshotStorage: Send + Sync {
    /// Read the serialized value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), DbError>;
}

/// Snapshot storage backed by the `snapshots` table.
pub struct SnapshotRepository {
    db: Mutex<Database>,
}

impl SnapshotRepository {
    /// Wrap an opened database.
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Open the default database, run migrations, and wrap it.
    pub fn open() -> anyhow::Result<Self> {
        let db = Database::open()?;
        db.migrate()?;
        Ok(Self::new(db))
    }

    /// Get a stored snapshot value.
    pub fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        let result: Result<String, _> = db.conn().query_row(
            "SELECT value FROM snapshots WHERE key = ?",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::Database(e)),
        }
    }

    /// Insert or replace a snapshot value.
    pub fn set(&self, key: &str, value: &str) -> Result<(), DbError> {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        db.conn().execute(
            "INSERT INTO snapshots (key, value, updated_at) VALUES (?, ?, unixepoch())
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            [key, value],
        )?;
        Ok(())
    }

    /// Delete a stored snapshot.
    pub fn delete(&self, key: &str) -> Result<(), DbError> {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        db.conn()
            .execute("DELETE FROM snapshots WHERE key = ?", [key])?;
        Ok(())
    }
}

impl SnapshotStorage for SnapshotRepository {
    fn read(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read snapshot {key:?}: {e}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.set(key, value)
    }
}

/// In-process snapshot storage for tests and embedding.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, as if a previous session had written it.
    pub fn seed(self, key: &str, value: &str) -> Self {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
