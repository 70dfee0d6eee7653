//! The complete board state and its pure transitions.
//!
//! Every mutating method borrows the current snapshot and returns a new one,
//! leaving `self` untouched. `None` means the request referenced something
//! that does not exist (or changes nothing) and the state stays as it was.

use crate::{
    domain::{
        board::Board,
        card::{CardUpdate, NewCard},
        column::Column,
        drag::CardMove,
        id::{BoardId, CardId, ColumnId, UserId},
        user::User,
    },
    error::{KanbanError, Result},
};
use serde::{Deserialize, Serialize};

/// Full state of the store at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_user: User,
    pub users: Vec<User>,
    pub boards: Vec<Board>,
}

impl Default for Snapshot {
    fn default() -> Self {
        let users = User::default_users();
        Self {
            current_user: users[0].clone(),
            users,
            boards: Vec::new(),
        }
    }
}

impl Snapshot {
    /// Creates an empty snapshot for the given users
    pub fn new(current_user: User, users: Vec<User>) -> Self {
        Self {
            current_user,
            users,
            boards: Vec::new(),
        }
    }

    pub fn board(&self, id: &BoardId) -> Option<&Board> {
        self.boards.iter().find(|board| &board.id == id)
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == id)
    }

    /// Looks up a board for display; the only lookup that reports a miss
    pub fn resolve_board(&self, id: &BoardId) -> Result<&Board> {
        self.board(id)
            .ok_or_else(|| KanbanError::BoardNotFound(id.to_string()))
    }

    pub fn add_board(&self, title: &str, description: &str) -> (Snapshot, BoardId) {
        let board = Board::new(title, description, self.current_user.id.clone());
        let id = board.id.clone();

        let mut next = self.clone();
        next.boards.push(board);
        (next, id)
    }

    pub fn update_board(&self, id: &BoardId, title: &str, description: &str) -> Option<Snapshot> {
        self.with_board(id, |board| {
            board.title = title.to_string();
            board.description = description.to_string();
            Some(())
        })
        .map(|(next, ())| next)
    }

    pub fn delete_board(&self, id: &BoardId) -> Option<Snapshot> {
        let position = self.boards.iter().position(|board| &board.id == id)?;

        let mut next = self.clone();
        next.boards.remove(position);
        Some(next)
    }

    pub fn add_column(&self, board_id: &BoardId, title: &str) -> Option<(Snapshot, ColumnId)> {
        self.with_board(board_id, |board| {
            let column = Column::new(title);
            let id = column.id.clone();
            board.columns.push(column);
            Some(id)
        })
    }

    pub fn update_column(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
        title: &str,
    ) -> Option<Snapshot> {
        self.with_board(board_id, |board| {
            board.column_mut(column_id)?.title = title.to_string();
            Some(())
        })
        .map(|(next, ())| next)
    }

    pub fn delete_column(&self, board_id: &BoardId, column_id: &ColumnId) -> Option<Snapshot> {
        self.with_board(board_id, |board| {
            let position = board.column_position(column_id)?;
            board.columns.remove(position);
            Some(())
        })
        .map(|(next, ())| next)
    }

    /// Appends a card created by the current user. Rejects assignees that
    /// are not registered users.
    pub fn add_card(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
        card: NewCard,
    ) -> Option<(Snapshot, CardId)> {
        self.user(&card.assigned_to)?;
        let created_by = self.current_user.id.clone();

        self.with_board(board_id, |board| {
            let column = board.column_mut(column_id)?;
            let card = card.into_card(created_by);
            let id = card.id.clone();
            column.cards.push(card);
            Some(id)
        })
    }

    pub fn update_card(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
        card_id: &CardId,
        update: &CardUpdate,
    ) -> Option<Snapshot> {
        if update.is_empty() {
            return None;
        }
        if let Some(assignee) = &update.assigned_to {
            self.user(assignee)?;
        }

        self.with_board(board_id, |board| {
            let column = board.column_mut(column_id)?;
            let position = column.card_position(card_id)?;
            column.cards[position] = column.cards[position].merged(update);
            Some(())
        })
        .map(|(next, ())| next)
    }

    pub fn delete_card(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
        card_id: &CardId,
    ) -> Option<Snapshot> {
        self.with_board(board_id, |board| {
            let column = board.column_mut(column_id)?;
            let position = column.card_position(card_id)?;
            column.cards.remove(position);
            Some(())
        })
        .map(|(next, ())| next)
    }

    pub fn move_card(&self, board_id: &BoardId, mv: &CardMove) -> Option<Snapshot> {
        if mv.is_in_place() {
            return None;
        }

        self.with_board(board_id, |board| board.move_card(mv).then_some(()))
            .map(|(next, ())| next)
    }

    /// Applies `edit` to a copy of the named board. The copy only becomes a
    /// new snapshot if the board exists and `edit` returns `Some`.
    fn with_board<T>(
        &self,
        id: &BoardId,
        edit: impl FnOnce(&mut Board) -> Option<T>,
    ) -> Option<(Snapshot, T)> {
        let position = self.boards.iter().position(|board| &board.id == id)?;

        let mut board = self.boards[position].clone();
        let value = edit(&mut board)?;

        let mut next = self.clone();
        next.boards[position] = board;
        Some((next, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Priority;

    fn board_with_column() -> (Snapshot, BoardId, ColumnId) {
        let (state, board_id) = Snapshot::default().add_board("Sprint", "Week 1");
        let (state, column_id) = state.add_column(&board_id, "To Do").unwrap();
        (state, board_id, column_id)
    }

    #[test]
    fn test_default_seed() {
        let state = Snapshot::default();
        assert_eq!(state.current_user.id.as_str(), "user-1");
        assert_eq!(state.users.len(), 2);
        assert!(state.boards.is_empty());
    }

    #[test]
    fn test_add_board_sets_creator_and_leaves_original() {
        let original = Snapshot::default();
        let (next, id) = original.add_board("Project", "Description");

        assert!(original.boards.is_empty());
        let board = next.board(&id).unwrap();
        assert_eq!(board.title, "Project");
        assert_eq!(board.description, "Description");
        assert_eq!(board.created_by.as_str(), "user-1");
        assert!(board.columns.is_empty());
    }

    #[test]
    fn test_boards_keep_insertion_order() {
        let (state, a) = Snapshot::default().add_board("A", "");
        let (state, b) = state.add_board("B", "");
        let ids: Vec<_> = state.boards.iter().map(|board| board.id.clone()).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_update_board() {
        let (state, id) = Snapshot::default().add_board("Old", "old");
        let next = state.update_board(&id, "New", "new").unwrap();

        let board = next.board(&id).unwrap();
        assert_eq!(board.title, "New");
        assert_eq!(board.description, "new");
        assert_eq!(board.created_at, state.board(&id).unwrap().created_at);
    }

    #[test]
    fn test_missing_board_is_noop() {
        let state = Snapshot::default();
        let missing = BoardId::new();

        assert!(state.update_board(&missing, "x", "y").is_none());
        assert!(state.delete_board(&missing).is_none());
        assert!(state.add_column(&missing, "Col").is_none());
    }

    #[test]
    fn test_delete_board_cascades() {
        let (state, board_id, column_id) = board_with_column();
        let (state, card_id) = state
            .add_card(&board_id, &column_id, NewCard::new("Card", "user-2"))
            .unwrap();

        let next = state.delete_board(&board_id).unwrap();
        assert!(next.boards.is_empty());
        assert!(next
            .delete_card(&board_id, &column_id, &card_id)
            .is_none());
    }

    #[test]
    fn test_update_and_delete_column() {
        let (state, board_id, column_id) = board_with_column();

        let renamed = state.update_column(&board_id, &column_id, "Backlog").unwrap();
        let column = renamed.board(&board_id).unwrap().column(&column_id).unwrap();
        assert_eq!(column.title, "Backlog");

        let deleted = renamed.delete_column(&board_id, &column_id).unwrap();
        assert!(deleted.board(&board_id).unwrap().columns.is_empty());

        assert!(deleted.update_column(&board_id, &column_id, "x").is_none());
        assert!(deleted.delete_column(&board_id, &column_id).is_none());
    }

    #[test]
    fn test_add_card_appends_with_current_user() {
        let (state, board_id, column_id) = board_with_column();
        let (state, first) = state
            .add_card(&board_id, &column_id, NewCard::new("First", "user-2"))
            .unwrap();
        let (state, second) = state
            .add_card(&board_id, &column_id, NewCard::new("Second", "user-1"))
            .unwrap();

        let column = state.board(&board_id).unwrap().column(&column_id).unwrap();
        assert_eq!(column.card_ids(), vec![&first, &second]);
        assert_eq!(column.cards[0].created_by.as_str(), "user-1");
        assert_eq!(column.cards[0].assigned_to.as_str(), "user-2");
    }

    #[test]
    fn test_add_card_rejects_unknown_targets() {
        let (state, board_id, column_id) = board_with_column();

        assert!(state
            .add_card(&board_id, &ColumnId::new(), NewCard::new("x", "user-1"))
            .is_none());
        assert!(state
            .add_card(&BoardId::new(), &column_id, NewCard::new("x", "user-1"))
            .is_none());
        assert!(state
            .add_card(&board_id, &column_id, NewCard::new("x", "nobody"))
            .is_none());
    }

    #[test]
    fn test_update_card_merges_fields() {
        let (state, board_id, column_id) = board_with_column();
        let (state, card_id) = state
            .add_card(
                &board_id,
                &column_id,
                NewCard::new("Task", "user-2").with_priority(Priority::Low),
            )
            .unwrap();

        let update = CardUpdate::default().title("Renamed").assigned_to("user-1");
        let next = state
            .update_card(&board_id, &column_id, &card_id, &update)
            .unwrap();

        let card = next
            .board(&board_id)
            .and_then(|board| board.column(&column_id))
            .and_then(|column| column.card(&card_id))
            .unwrap();
        assert_eq!(card.title, "Renamed");
        assert_eq!(card.assigned_to.as_str(), "user-1");
        assert_eq!(card.priority, Priority::Low);
    }

    #[test]
    fn test_update_card_rejects_unknown_assignee() {
        let (state, board_id, column_id) = board_with_column();
        let (state, card_id) = state
            .add_card(&board_id, &column_id, NewCard::new("Task", "user-2"))
            .unwrap();

        let update = CardUpdate::default().assigned_to("ghost");
        assert!(state
            .update_card(&board_id, &column_id, &card_id, &update)
            .is_none());
    }

    #[test]
    fn test_empty_update_is_noop() {
        let (state, board_id, column_id) = board_with_column();
        let (state, card_id) = state
            .add_card(&board_id, &column_id, NewCard::new("Task", "user-2"))
            .unwrap();

        assert!(state
            .update_card(&board_id, &column_id, &card_id, &CardUpdate::default())
            .is_none());
    }

    #[test]
    fn test_move_in_place_is_noop() {
        let (state, board_id, column_id) = board_with_column();
        let (state, card_id) = state
            .add_card(&board_id, &column_id, NewCard::new("Task", "user-2"))
            .unwrap();

        let mv = CardMove::new(column_id.clone(), column_id, 0, 0, card_id);
        assert!(state.move_card(&board_id, &mv).is_none());
    }

    #[test]
    fn test_resolve_board() {
        let (state, id) = Snapshot::default().add_board("A", "");
        assert!(state.resolve_board(&id).is_ok());

        let err = state.resolve_board(&BoardId::new()).unwrap_err();
        assert!(matches!(err, KanbanError::BoardNotFound(_)));
        assert_eq!(err.to_string(), "Board not found");
    }

    #[test]
    fn test_snapshot_serialization_shape() {
        let (state, _) = Snapshot::default().add_board("A", "");
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["currentUser"]["id"], "user-1");
        assert!(json["boards"][0]["createdAt"].is_string());
        assert_eq!(json["boards"][0]["createdBy"], "user-1");
    }
}
