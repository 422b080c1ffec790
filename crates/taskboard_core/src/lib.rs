//! Ordered-collection position engine for task boards.
//! Lists inside a board and tasks inside a list keep contiguous 1-based
//! positions across append, reorder, move and cascading delete.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{active_config, init_logging, LogConfig, LogLevel, LoggingError};
pub use model::board::{Board, BoardId, BoardStatus};
pub use model::detail::{ChecklistItem, DetailCounts, TaskAttachment, TaskComment};
pub use model::list::{BoardList, ListId};
pub use model::position::{is_contiguous, PositionError, PARKED_POSITION};
pub use model::task::{Task, TaskId, TaskPatch, TaskPriority};
pub use repo::board_repo::{BoardRepository, SqliteBoardRepository};
pub use repo::cascade::CascadeReport;
pub use repo::detail_repo::{SqliteTaskDetailRepository, TaskDetailRepository};
pub use repo::error::{BoardRepoError, BoardRepoResult};
pub use repo::list_repo::{DeletedList, ListRepository, SqliteListRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskMove, TaskRepository};
pub use service::board_service::BoardService;
pub use service::detail_service::TaskDetailService;
pub use service::error::{BoardServiceError, ErrorKind};
pub use service::list_service::ListService;
pub use service::task_service::TaskService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
