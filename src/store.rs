//! The board store: one current snapshot, pure transitions, write-through
//! persistence.
//!
//! Mutating operations take `&mut self`, so there is exactly one writer and
//! every call is a single transition visible to the next read. Readers hold
//! `Arc<Snapshot>` values that stay valid after the store moves on.
//!
//! A lookup miss (unknown board, column or card) changes nothing: no new
//! snapshot is published and storage is not written. Storage failures are
//! logged and otherwise ignored; the in-memory state is never rolled back.
//!
//! An unreadable stored snapshot is moved to the backup key before the store
//! falls back to its seed. If that move fails, nothing is written until
//! `reset` so the stored data is never overwritten.

use crate::{
    config::StoreConfig,
    domain::{BoardId, CardId, CardMove, CardUpdate, ColumnId, DropResult, NewCard, Snapshot},
    error::{KanbanError, Result},
    storage::Storage,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

pub struct BoardStore {
    state: watch::Sender<Arc<Snapshot>>,
    storage: Arc<dyn Storage>,
    config: StoreConfig,
    seed: Snapshot,
    persist_blocked: bool,
}

impl BoardStore {
    /// Opens a store over `storage`, restoring the persisted snapshot if one
    /// can be read and falling back to the configured seed otherwise.
    ///
    /// Only an invalid configuration, or a storage backend bound to a key
    /// other than `config.storage_key`, is an error.
    pub async fn open(storage: Arc<dyn Storage>, config: StoreConfig) -> Result<Self> {
        let seed = config.seed_snapshot()?;
        if storage.key() != config.storage_key {
            return Err(KanbanError::ConfigError(format!(
                "storage is bound to key '{}' but the config names '{}'",
                storage.key(),
                config.storage_key
            )));
        }

        if let Err(err) = storage.initialize().await {
            warn!(error = %err, key = %config.storage_key, "failed to initialize storage");
        }

        let mut persist_blocked = false;
        let initial = match storage.load_snapshot().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => seed.clone(),
            Err(err) => {
                warn!(error = %err, key = %config.storage_key, "unreadable snapshot, using seed");
                if let Err(err) = storage.quarantine().await {
                    warn!(
                        error = %err,
                        key = %config.storage_key,
                        "failed to back up unreadable snapshot, persistence paused until reset"
                    );
                    persist_blocked = true;
                }
                seed.clone()
            }
        };

        info!(
            key = %config.storage_key,
            boards = initial.boards.len(),
            "board store opened"
        );

        let (state, _) = watch::channel(Arc::new(initial));
        Ok(Self {
            state,
            storage,
            config,
            seed,
            persist_blocked,
        })
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.state.borrow())
    }

    /// Receives every snapshot the store publishes from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.state.subscribe()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub async fn add_board(&mut self, title: &str, description: &str) -> BoardId {
        let (next, id) = self.snapshot().add_board(title, description);
        debug!(board_id = %id, "added board");
        self.commit(next).await;
        id
    }

    pub async fn update_board(&mut self, id: &BoardId, title: &str, description: &str) -> bool {
        let next = self.snapshot().update_board(id, title, description);
        self.apply("update_board", next).await
    }

    pub async fn delete_board(&mut self, id: &BoardId) -> bool {
        let next = self.snapshot().delete_board(id);
        self.apply("delete_board", next).await
    }

    pub async fn add_column(&mut self, board_id: &BoardId, title: &str) -> Option<ColumnId> {
        let Some((next, id)) = self.snapshot().add_column(board_id, title) else {
            trace!(%board_id, "add_column: board not found");
            return None;
        };
        debug!(%board_id, column_id = %id, "added column");
        self.commit(next).await;
        Some(id)
    }

    pub async fn update_column(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        title: &str,
    ) -> bool {
        let next = self.snapshot().update_column(board_id, column_id, title);
        self.apply("update_column", next).await
    }

    pub async fn delete_column(&mut self, board_id: &BoardId, column_id: &ColumnId) -> bool {
        let next = self.snapshot().delete_column(board_id, column_id);
        self.apply("delete_column", next).await
    }

    pub async fn add_card(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        card: NewCard,
    ) -> Option<CardId> {
        let Some((next, id)) = self.snapshot().add_card(board_id, column_id, card) else {
            trace!(%board_id, %column_id, "add_card: target or assignee not found");
            return None;
        };
        debug!(%board_id, %column_id, card_id = %id, "added card");
        self.commit(next).await;
        Some(id)
    }

    pub async fn update_card(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        card_id: &CardId,
        update: &CardUpdate,
    ) -> bool {
        let next = self
            .snapshot()
            .update_card(board_id, column_id, card_id, update);
        self.apply("update_card", next).await
    }

    pub async fn delete_card(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        card_id: &CardId,
    ) -> bool {
        let next = self.snapshot().delete_card(board_id, column_id, card_id);
        self.apply("delete_card", next).await
    }

    pub async fn move_card(&mut self, board_id: &BoardId, mv: &CardMove) -> bool {
        let next = self.snapshot().move_card(board_id, mv);
        self.apply("move_card", next).await
    }

    /// Applies a finished drag gesture; cancelled or in-place drops do nothing
    pub async fn handle_drop(&mut self, board_id: &BoardId, result: DropResult) -> bool {
        match result.into_card_move() {
            Some(mv) => self.move_card(board_id, &mv).await,
            None => false,
        }
    }

    /// Replaces all state with the configured seed
    pub async fn reset(&mut self) {
        info!(key = %self.config.storage_key, "resetting board store");
        self.persist_blocked = false;
        self.commit(self.seed.clone()).await;
    }

    async fn apply(&mut self, operation: &'static str, next: Option<Snapshot>) -> bool {
        match next {
            Some(next) => {
                debug!(operation, "applied transition");
                self.commit(next).await;
                true
            }
            None => {
                trace!(operation, "no matching target, state unchanged");
                false
            }
        }
    }

    async fn commit(&mut self, next: Snapshot) {
        let next = Arc::new(next);
        self.state.send_replace(Arc::clone(&next));

        if self.persist_blocked {
            trace!(key = %self.config.storage_key, "persistence paused, snapshot not written");
            return;
        }
        if let Err(err) = self.storage.save_snapshot(&next).await {
            warn!(error = %err, key = %self.config.storage_key, "failed to persist snapshot");
        }
    }
}
