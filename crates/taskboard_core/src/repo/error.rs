//! Repository error type shared by board, list, task and detail storage.

use crate::db::DbError;
use crate::model::board::BoardId;
use crate::model::list::ListId;
use crate::model::position::PositionError;
use crate::model::task::TaskId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by board repository operations.
pub type BoardRepoResult<T> = Result<T, BoardRepoError>;

/// Errors from board/list/task repository operations.
///
/// Every variant other than `Db` is raised before the surrounding transaction
/// commits, so the store is left unchanged.
#[derive(Debug)]
pub enum BoardRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target board does not exist.
    BoardNotFound(BoardId),
    /// Target list does not exist.
    ListNotFound(ListId),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Requested position is outside the container.
    Position(PositionError),
    /// List belongs to a different board than the caller supplied.
    CrossBoard { list_id: ListId, board_id: BoardId },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for BoardRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Position(err) => write!(f, "{err}"),
            Self::CrossBoard { list_id, board_id } => {
                write!(f, "list {list_id} does not belong to board {board_id}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "board repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "board repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid board data: {message}"),
        }
    }
}

impl Error for BoardRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Position(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for BoardRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BoardRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<PositionError> for BoardRepoError {
    fn from(value: PositionError) -> Self {
        Self::Position(value)
    }
}
