//! Boundary between drag-and-drop events and card moves.
//!
//! A UI drag library reports drops as a source location, an optional
//! destination and the dragged item's id. Those payloads are converted here
//! into a [`CardMove`]; nothing else in the crate knows about drag events.

use crate::domain::id::{CardId, ColumnId};
use serde::{Deserialize, Serialize};

/// Request to relocate one card within a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMove {
    pub source_column_id: ColumnId,
    pub destination_column_id: ColumnId,
    pub source_index: usize,
    pub destination_index: usize,
    pub card_id: CardId,
}

impl CardMove {
    pub fn new(
        source_column_id: impl Into<ColumnId>,
        destination_column_id: impl Into<ColumnId>,
        source_index: usize,
        destination_index: usize,
        card_id: impl Into<CardId>,
    ) -> Self {
        Self {
            source_column_id: source_column_id.into(),
            destination_column_id: destination_column_id.into(),
            source_index,
            destination_index,
            card_id: card_id.into(),
        }
    }

    /// True when the card would land exactly where it started
    pub fn is_in_place(&self) -> bool {
        self.source_column_id == self.destination_column_id
            && self.source_index == self.destination_index
    }
}

/// A position inside a droppable list (a column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragLocation {
    pub droppable_id: String,
    pub index: usize,
}

/// Result of a finished drag gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropResult {
    pub source: DragLocation,
    pub destination: Option<DragLocation>,
    pub draggable_id: String,
}

impl DropResult {
    /// Converts the drop into a move, or `None` for a cancelled drag or a
    /// drop at the starting position
    pub fn into_card_move(self) -> Option<CardMove> {
        let destination = self.destination?;
        let card_move = CardMove::new(
            self.source.droppable_id,
            destination.droppable_id,
            self.source.index,
            destination.index,
            self.draggable_id,
        );

        if card_move.is_in_place() {
            return None;
        }
        Some(card_move)
    }
}
