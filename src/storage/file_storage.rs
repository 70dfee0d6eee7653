use crate::{
    domain::Snapshot,
    error::Result,
    storage::{backup_key, decode_snapshot, encode_snapshot, Storage},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage: one JSON file per storage key
pub struct FileStorage {
    root_path: PathBuf,
    key: String,
}

impl FileStorage {
    const STORE_DIR: &'static str = ".kanban";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::STORE_DIR),
            key: key.into(),
        }
    }

    fn snapshot_file(&self) -> PathBuf {
        self.root_path.join(format!("{}.json", self.key))
    }

    fn backup_file(&self) -> PathBuf {
        self.root_path.join(format!("{}.json", backup_key(&self.key)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    fn key(&self) -> &str {
        &self.key
    }

    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await
    }

    async fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        let file_path = self.snapshot_file();

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(Some(decode_snapshot(&contents)?))
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let json = encode_snapshot(snapshot)?;
        fs::write(self.snapshot_file(), json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let file_path = self.snapshot_file();
        if file_path.exists() {
            fs::remove_file(file_path).await?;
        }
        Ok(())
    }

    async fn quarantine(&self) -> Result<()> {
        let file_path = self.snapshot_file();
        if file_path.exists() {
            fs::rename(file_path, self.backup_file()).await?;
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{NewCard, Priority},
        error::KanbanError,
        storage::DEFAULT_STORAGE_KEY,
    };
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_storage_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), DEFAULT_STORAGE_KEY);

        assert!(!storage.is_initialized().await);

        storage.initialize().await.unwrap();

        assert!(storage.is_initialized().await);
        assert!(!storage.snapshot_file().exists());
    }

    #[tokio::test]
    async fn test_load_before_save() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), DEFAULT_STORAGE_KEY);
        storage.initialize().await.unwrap();

        assert!(storage.load_snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_save_and_load_with_dates() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), DEFAULT_STORAGE_KEY);
        storage.initialize().await.unwrap();

        let due = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let (state, board_id) = Snapshot::default().add_board("Board", "");
        let (state, column_id) = state.add_column(&board_id, "To Do").unwrap();
        let (state, card_id) = state
            .add_card(
                &board_id,
                &column_id,
                NewCard::new("Card", "user-2")
                    .with_priority(Priority::High)
                    .with_due_date(due),
            )
            .unwrap();

        storage.save_snapshot(&state).await.unwrap();
        assert!(storage.snapshot_file().exists());

        let loaded = storage.load_snapshot().await.unwrap().unwrap();
        let card = loaded
            .board(&board_id)
            .and_then(|board| board.column(&column_id))
            .and_then(|column| column.card(&card_id))
            .unwrap();
        assert_eq!(card.due_date, due);
        assert_eq!(card.priority, Priority::High);
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let first = FileStorage::new(temp_dir.path(), "first");
        let second = FileStorage::new(temp_dir.path(), "second");

        let (state, _) = Snapshot::default().add_board("Board", "");
        first.save_snapshot(&state).await.unwrap();

        assert!(first.load_snapshot().await.unwrap().is_some());
        assert!(second.load_snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), DEFAULT_STORAGE_KEY);
        storage.initialize().await.unwrap();
        fs::write(storage.snapshot_file(), "{ broken").await.unwrap();

        let result = storage.load_snapshot().await;
        assert!(matches!(result, Err(KanbanError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_quarantine_keeps_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), DEFAULT_STORAGE_KEY);
        storage.initialize().await.unwrap();
        fs::write(storage.snapshot_file(), "{ broken").await.unwrap();

        storage.quarantine().await.unwrap();
        storage.save_snapshot(&Snapshot::default()).await.unwrap();

        let backup = fs::read_to_string(storage.backup_file()).await.unwrap();
        assert_eq!(backup, "{ broken");
        assert!(storage.load_snapshot().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), DEFAULT_STORAGE_KEY);

        storage.save_snapshot(&Snapshot::default()).await.unwrap();
        storage.clear().await.unwrap();

        assert!(!storage.snapshot_file().exists());
        storage.clear().await.unwrap();
    }
}
