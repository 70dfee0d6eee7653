use crate::domain::{
    card::Card,
    column::Column,
    drag::CardMove,
    id::{BoardId, CardId, ColumnId, UserId},
    user::deserialize_user_ref,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kanban board: an ordered sequence of columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_user_ref")]
    pub created_by: UserId,
    pub columns: Vec<Column>,
}

impl Board {
    /// Creates a board with a fresh id and no columns
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        created_by: UserId,
    ) -> Self {
        Self {
            id: BoardId::new(),
            title: title.into(),
            description: description.into(),
            created_at: Utc::now(),
            created_by,
            columns: Vec::new(),
        }
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.id == id)
    }

    pub fn column_mut(&mut self, id: &ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|col| &col.id == id)
    }

    pub fn column_position(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|col| &col.id == id)
    }

    /// Finds a card anywhere on the board, with the column holding it
    pub fn find_card(&self, id: &CardId) -> Option<(&Column, &Card)> {
        self.columns
            .iter()
            .find_map(|col| col.card(id).map(|card| (col, card)))
    }

    /// Total number of cards across all columns
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|col| col.cards.len()).sum()
    }

    /// Relocates a card; returns false (leaving the board untouched) when
    /// either column or the card cannot be found, or the move is in place.
    ///
    /// The card is removed by id, then inserted at `destination_index` in the
    /// destination sequence as it stands after removal. Indices past the end
    /// append.
    pub fn move_card(&mut self, mv: &CardMove) -> bool {
        if mv.is_in_place() {
            return false;
        }

        let Some(source) = self.column_position(&mv.source_column_id) else {
            return false;
        };
        let Some(destination) = self.column_position(&mv.destination_column_id) else {
            return false;
        };
        let Some(card_pos) = self.columns[source].card_position(&mv.card_id) else {
            return false;
        };

        let card = self.columns[source].cards.remove(card_pos);
        let cards = &mut self.columns[destination].cards;
        let index = mv.destination_index.min(cards.len());
        cards.insert(index, card);
        true
    }
}
