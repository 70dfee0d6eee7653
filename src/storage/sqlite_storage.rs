use crate::{
    domain::Snapshot,
    error::{KanbanError, Result},
    storage::{backup_key, decode_snapshot, encode_snapshot, Storage},
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed key-value storage; the snapshot is one row keyed by name
pub struct SqliteStorage {
    connection: Mutex<Connection>,
    key: String,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `database_path`
    pub fn new(database_path: &str, key: impl Into<String>) -> Result<Self> {
        Ok(Self::from_connection(Connection::open(database_path)?, key))
    }

    /// Opens a private in-memory database
    pub fn in_memory(key: impl Into<String>) -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?, key))
    }

    fn from_connection(connection: Connection, key: impl Into<String>) -> Self {
        Self {
            connection: Mutex::new(connection),
            key: key.into(),
        }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| KanbanError::StorageError("sqlite connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    fn key(&self) -> &str {
        &self.key
    }

    async fn initialize(&self) -> Result<()> {
        self.connection()?.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        let value: Option<String> = self
            .connection()?
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![self.key],
                |row| row.get(0),
            )
            .optional()?;

        value.map(|json| decode_snapshot(&json)).transpose()
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let json = encode_snapshot(snapshot)?;
        self.connection()?.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![self.key, json],
        )?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.connection()?
            .execute("DELETE FROM kv_store WHERE key = ?1", params![self.key])?;
        Ok(())
    }

    async fn quarantine(&self) -> Result<()> {
        let mut connection = self.connection()?;
        let tx = connection.transaction()?;
        tx.execute(
            "INSERT INTO kv_store (key, value) SELECT ?2, value FROM kv_store WHERE key = ?1
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![self.key, backup_key(&self.key)],
        )?;
        tx.execute("DELETE FROM kv_store WHERE key = ?1", params![self.key])?;
        tx.commit()?;
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        let Ok(connection) = self.connection() else {
            return false;
        };
        connection
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'",
                [],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
            .unwrap_or(false)
    }
}
