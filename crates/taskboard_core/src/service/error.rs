//! Service-level error taxonomy for board, list and task use-cases.

use crate::model::board::BoardId;
use crate::model::list::ListId;
use crate::model::position::PositionError;
use crate::model::task::TaskId;
use crate::repo::error::BoardRepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Coarse failure category callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced board/list/task does not exist.
    NotFound,
    /// Bad input: blank required field or position outside the container.
    InvalidOperation,
    /// List does not belong to the board supplied by the caller.
    CrossScopeViolation,
    /// Store failed; the transaction was rolled back.
    StorageFailure,
}

/// Errors from board/list/task service operations.
///
/// Whatever the variant, the store is left exactly as it was before the call.
#[derive(Debug)]
pub enum BoardServiceError {
    /// Required text field is blank after trim.
    BlankField(&'static str),
    BoardNotFound(BoardId),
    ListNotFound(ListId),
    TaskNotFound(TaskId),
    /// Requested position is outside the container.
    InvalidPosition(PositionError),
    /// List belongs to a different board than the caller supplied.
    CrossBoard { list_id: ListId, board_id: BoardId },
    /// Repository-level failure.
    Repo(BoardRepoError),
}

impl BoardServiceError {
    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BoardNotFound(_) | Self::ListNotFound(_) | Self::TaskNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::BlankField(_) | Self::InvalidPosition(_) => ErrorKind::InvalidOperation,
            Self::CrossBoard { .. } => ErrorKind::CrossScopeViolation,
            Self::Repo(_) => ErrorKind::StorageFailure,
        }
    }
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidPosition(err) => write!(f, "invalid position: {err}"),
            Self::CrossBoard { list_id, board_id } => {
                write!(f, "list {list_id} does not belong to board {board_id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPosition(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BoardRepoError> for BoardServiceError {
    fn from(value: BoardRepoError) -> Self {
        match value {
            BoardRepoError::BoardNotFound(id) => Self::BoardNotFound(id),
            BoardRepoError::ListNotFound(id) => Self::ListNotFound(id),
            BoardRepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            BoardRepoError::Position(err) => Self::InvalidPosition(err),
            BoardRepoError::CrossBoard { list_id, board_id } => {
                Self::CrossBoard { list_id, board_id }
            }
            other => Self::Repo(other),
        }
    }
}

impl From<PositionError> for BoardServiceError {
    fn from(value: PositionError) -> Self {
        Self::InvalidPosition(value)
    }
}

/// Trims `value`, rejecting blank input as `BlankField(field)`.
pub(crate) fn normalize_required(
    value: String,
    field: &'static str,
) -> Result<String, BoardServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardServiceError::BlankField(field));
    }
    Ok(trimmed.to_string())
}
