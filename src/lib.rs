//! # Kanban Store
//!
//! Board, column and card state for a single-user kanban editor.
//!
//! The state is an immutable [`Snapshot`] with pure transition methods; a
//! [`BoardStore`] holds the current snapshot, applies transitions and writes
//! each new snapshot through to a [`Storage`] backend. Rendering and drag
//! gestures live outside this crate and talk to it through the store
//! operations and [`DropResult`].

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::StoreConfig;
pub use domain::{
    Board, BoardId, BoardRow, Card, CardId, CardMove, CardUpdate, Column, ColumnId, DragLocation,
    DropResult, NewCard, Priority, Snapshot, User, UserId,
};
pub use error::{KanbanError, Result};
pub use storage::{MemoryStorage, Storage};
pub use store::BoardStore;
