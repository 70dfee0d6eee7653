use crate::{
    domain::Snapshot,
    error::{KanbanError, Result},
    storage::{backup_key, decode_snapshot, encode_snapshot, Storage, DEFAULT_STORAGE_KEY},
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

/// In-process key-value storage, the analogue of a browser's local storage
pub struct MemoryStorage {
    key: String,
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent write fail until switched back
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns the raw value stored under the snapshot key
    pub fn raw(&self) -> Result<Option<String>> {
        Ok(self.entries()?.get(&self.key).cloned())
    }

    /// Returns the raw value moved aside by `quarantine`
    pub fn backup(&self) -> Result<Option<String>> {
        Ok(self.entries()?.get(&backup_key(&self.key)).cloned())
    }

    /// Stores a raw value under the snapshot key, bypassing encoding
    pub fn put_raw(&self, value: impl Into<String>) -> Result<()> {
        self.entries()?.insert(self.key.clone(), value.into());
        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KanbanError::StorageError(format!(
                "write to '{}' rejected",
                self.key
            )));
        }
        Ok(())
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| KanbanError::StorageError("memory storage lock poisoned".to_string()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn key(&self) -> &str {
        &self.key
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        match self.raw()? {
            Some(json) => Ok(Some(decode_snapshot(&json)?)),
            None => Ok(None),
        }
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.check_writable()?;
        let json = encode_snapshot(snapshot)?;
        self.put_raw(json)
    }

    async fn clear(&self) -> Result<()> {
        self.entries()?.remove(&self.key);
        Ok(())
    }

    async fn quarantine(&self) -> Result<()> {
        self.check_writable()?;
        let mut entries = self.entries()?;
        if let Some(value) = entries.remove(&self.key) {
            entries.insert(backup_key(&self.key), value);
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        true
    }
}
