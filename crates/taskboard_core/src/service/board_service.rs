//! Board use-case service.
//!
//! # Responsibility
//! - Create, rename, list and soft-close the boards lists live in.

use crate::model::board::{Board, BoardId, BoardStatus};
use crate::repo::board_repo::BoardRepository;
use crate::service::error::{normalize_required, BoardServiceError};

/// Board service facade.
pub struct BoardService<R: BoardRepository> {
    repo: R,
}

impl<R: BoardRepository> BoardService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one active board.
    pub fn create_board(&self, name: impl Into<String>) -> Result<Board, BoardServiceError> {
        let name = normalize_required(name.into(), "board name")?;
        self.repo.create_board(name.as_str()).map_err(Into::into)
    }

    /// Loads one board, failing with not-found when absent.
    pub fn get_board(&self, board_id: BoardId) -> Result<Board, BoardServiceError> {
        self.repo
            .get_board(board_id)?
            .ok_or(BoardServiceError::BoardNotFound(board_id))
    }

    /// Lists boards; inactive ones only when asked for.
    pub fn boards(&self, include_inactive: bool) -> Result<Vec<Board>, BoardServiceError> {
        self.repo.list_boards(include_inactive).map_err(Into::into)
    }

    pub fn rename_board(
        &self,
        board_id: BoardId,
        name: impl Into<String>,
    ) -> Result<Board, BoardServiceError> {
        let name = normalize_required(name.into(), "board name")?;
        self.repo
            .rename_board(board_id, name.as_str())
            .map_err(Into::into)
    }

    /// Soft-closes one board. Its lists and tasks stay untouched.
    pub fn close_board(&self, board_id: BoardId) -> Result<Board, BoardServiceError> {
        self.repo
            .set_board_status(board_id, BoardStatus::Inactive)
            .map_err(Into::into)
    }

    pub fn reopen_board(&self, board_id: BoardId) -> Result<Board, BoardServiceError> {
        self.repo
            .set_board_status(board_id, BoardStatus::Active)
            .map_err(Into::into)
    }
}
