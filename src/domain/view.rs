use crate::domain::{id::BoardId, snapshot::Snapshot};
use chrono::{DateTime, Utc};

const UNKNOWN_USER: &str = "Unknown";

/// One line of the board listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub id: BoardId,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub created_at: String,
}

/// Formats a date the way board and card views show it (`Jan 05, 2024`)
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

impl Snapshot {
    /// Rows for the board listing, in board order
    pub fn board_rows(&self) -> Vec<BoardRow> {
        self.boards
            .iter()
            .map(|board| BoardRow {
                id: board.id.clone(),
                title: board.title.clone(),
                description: board.description.clone(),
                created_by: self
                    .user(&board.created_by)
                    .map(|user| user.name.clone())
                    .unwrap_or_else(|| UNKNOWN_USER.to_string()),
                created_at: format_date(board.created_at),
            })
            .collect()
    }
}
