//! List ordering use-case service.
//!
//! # Responsibility
//! - Validate list inputs above the repository layer.
//! - Expose append/reorder/delete with the engine error taxonomy.
//!
//! # Invariants
//! - List names are trimmed and never blank.
//! - A non-positive target position is rejected before a transaction opens;
//!   the upper bound is checked inside it against the live list count.

use crate::model::board::BoardId;
use crate::model::list::{BoardList, ListId};
use crate::model::position::PositionError;
use crate::repo::list_repo::{DeletedList, ListRepository};
use crate::service::error::{normalize_required, BoardServiceError};

/// List ordering service facade.
pub struct ListService<R: ListRepository> {
    repo: R,
}

impl<R: ListRepository> ListService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Appends one list after the last list of `board_id`.
    pub fn append_list(
        &self,
        board_id: BoardId,
        name: impl Into<String>,
    ) -> Result<BoardList, BoardServiceError> {
        let name = normalize_required(name.into(), "list name")?;
        self.repo
            .append_list(board_id, name.as_str())
            .map_err(Into::into)
    }

    /// Moves one list to `new_position` (1-based) inside `board_id`.
    ///
    /// Returns the list unchanged when it already sits at `new_position`.
    pub fn reorder_list(
        &self,
        board_id: BoardId,
        list_id: ListId,
        new_position: i64,
    ) -> Result<BoardList, BoardServiceError> {
        if new_position < 1 {
            return Err(PositionError::NotPositive(new_position).into());
        }
        self.repo
            .reorder_list(board_id, list_id, new_position)
            .map_err(Into::into)
    }

    /// Deletes one list, its tasks and their details, then closes the gap.
    ///
    /// Returns the pre-deletion record and a cascade report.
    pub fn delete_list(&self, list_id: ListId) -> Result<DeletedList, BoardServiceError> {
        self.repo.delete_list(list_id).map_err(Into::into)
    }

    pub fn rename_list(
        &self,
        list_id: ListId,
        name: impl Into<String>,
    ) -> Result<BoardList, BoardServiceError> {
        let name = normalize_required(name.into(), "list name")?;
        self.repo
            .rename_list(list_id, name.as_str())
            .map_err(Into::into)
    }

    /// Loads one list, failing with not-found when absent.
    pub fn get_list(&self, list_id: ListId) -> Result<BoardList, BoardServiceError> {
        self.repo
            .get_list(list_id)?
            .ok_or(BoardServiceError::ListNotFound(list_id))
    }

    /// Lists the lists of one board in position order.
    pub fn lists(&self, board_id: BoardId) -> Result<Vec<BoardList>, BoardServiceError> {
        self.repo.lists_for_board(board_id).map_err(Into::into)
    }
}
