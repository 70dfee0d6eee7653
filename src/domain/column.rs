use crate::domain::{
    card::Card,
    id::{CardId, ColumnId},
};
use serde::{Deserialize, Serialize};

/// An ordered stage within a board; card order is display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub cards: Vec<Card>,
}

impl Column {
    /// Creates an empty column with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ColumnId::new(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }

    pub fn card_position(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == id)
    }

    pub fn card_ids(&self) -> Vec<&CardId> {
        self.cards.iter().map(|card| &card.id).collect()
    }
}
