use crate::{
    domain::Snapshot,
    error::{KanbanError, Result},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Key the snapshot is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "task-board-storage";

/// Newest snapshot envelope version this crate reads and writes
pub const SNAPSHOT_VERSION: u32 = 0;

/// Storage trait for persisting the store snapshot under a single key
#[async_trait]
pub trait Storage: Send + Sync {
    /// Key the snapshot is stored under
    fn key(&self) -> &str;

    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Loads the persisted snapshot, if one has been saved
    async fn load_snapshot(&self) -> Result<Option<Snapshot>>;

    /// Overwrites the persisted snapshot
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()>;

    /// Removes the persisted snapshot
    async fn clear(&self) -> Result<()>;

    /// Moves the stored snapshot aside to the backup key so later saves
    /// cannot overwrite it
    async fn quarantine(&self) -> Result<()>;

    /// Checks if the backend has been initialized
    async fn is_initialized(&self) -> bool;
}

/// Key an unreadable snapshot is moved to
pub fn backup_key(key: &str) -> String {
    format!("{}.bak", key)
}

/// On-disk envelope around a snapshot
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<S> {
    state: S,
    version: u32,
}

/// Serializes a snapshot into the persisted JSON envelope
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String> {
    let envelope = Envelope {
        state: snapshot,
        version: SNAPSHOT_VERSION,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parses a persisted JSON envelope back into a snapshot
pub fn decode_snapshot(json: &str) -> Result<Snapshot> {
    let envelope: Envelope<Snapshot> = serde_json::from_str(json)?;
    if envelope.version > SNAPSHOT_VERSION {
        return Err(KanbanError::UnsupportedVersion {
            found: envelope.version,
            supported: SNAPSHOT_VERSION,
        });
    }
    Ok(envelope.state)
}
