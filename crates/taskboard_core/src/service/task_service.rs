//! Task ordering use-case service.
//!
//! # Responsibility
//! - Validate task inputs above the repository layer.
//! - Expose append, in-list reorder, and the two move flavors (append at the
//!   end of another list, or drop at an explicit slot on one board).
//!
//! # Invariants
//! - Task titles are trimmed and never blank.
//! - Both move flavors go through one repository operation, differing only
//!   in target slot and board scope.

use crate::model::board::BoardId;
use crate::model::list::ListId;
use crate::model::position::PositionError;
use crate::model::task::{Task, TaskId, TaskPatch};
use crate::repo::task_repo::{TaskMove, TaskRepository};
use crate::service::error::{normalize_required, BoardServiceError};

/// Task ordering service facade.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Appends one task after the last task of `list_id`.
    pub fn append_task(
        &self,
        list_id: ListId,
        title: impl Into<String>,
    ) -> Result<Task, BoardServiceError> {
        let title = normalize_required(title.into(), "task title")?;
        self.repo
            .append_task(list_id, title.as_str())
            .map_err(Into::into)
    }

    /// Moves one task to `new_position` inside its current list.
    pub fn reorder_task(
        &self,
        task_id: TaskId,
        new_position: i64,
    ) -> Result<Task, BoardServiceError> {
        if new_position < 1 {
            return Err(PositionError::NotPositive(new_position).into());
        }
        self.repo
            .reorder_task(task_id, new_position)
            .map_err(Into::into)
    }

    /// Moves one task to the end of `new_list_id`.
    pub fn move_task(
        &self,
        task_id: TaskId,
        new_list_id: ListId,
    ) -> Result<Task, BoardServiceError> {
        self.repo
            .move_task(&TaskMove {
                task_id,
                destination: new_list_id,
                position: None,
                board_scope: None,
            })
            .map_err(Into::into)
    }

    /// Moves one task to `new_position` of `new_list_id`; both the task's
    /// current list and the destination must belong to `board_id`.
    pub fn move_task_at_position(
        &self,
        board_id: BoardId,
        task_id: TaskId,
        new_list_id: ListId,
        new_position: i64,
    ) -> Result<Task, BoardServiceError> {
        if new_position < 1 {
            return Err(PositionError::NotPositive(new_position).into());
        }
        self.repo
            .move_task(&TaskMove {
                task_id,
                destination: new_list_id,
                position: Some(new_position),
                board_scope: Some(board_id),
            })
            .map_err(Into::into)
    }

    /// Updates domain fields; never changes list or position.
    pub fn update_task(
        &self,
        task_id: TaskId,
        mut patch: TaskPatch,
    ) -> Result<Task, BoardServiceError> {
        if let Some(title) = patch.title.take() {
            patch.title = Some(normalize_required(title, "task title")?);
        }
        if patch.is_empty() {
            return self.get_task(task_id);
        }
        self.repo.update_task(task_id, &patch).map_err(Into::into)
    }

    pub fn set_completed(
        &self,
        task_id: TaskId,
        is_completed: bool,
    ) -> Result<Task, BoardServiceError> {
        self.update_task(
            task_id,
            TaskPatch {
                is_completed: Some(is_completed),
                ..TaskPatch::default()
            },
        )
    }

    /// Loads one task, failing with not-found when absent.
    pub fn get_task(&self, task_id: TaskId) -> Result<Task, BoardServiceError> {
        self.repo
            .get_task(task_id)?
            .ok_or(BoardServiceError::TaskNotFound(task_id))
    }

    /// Lists the tasks of one list in position order.
    pub fn tasks(&self, list_id: ListId) -> Result<Vec<Task>, BoardServiceError> {
        self.repo.tasks_for_list(list_id).map_err(Into::into)
    }
}
