//! Task detail use-case service.

use crate::model::detail::{ChecklistItem, DetailCounts, TaskAttachment, TaskComment};
use crate::model::task::TaskId;
use crate::repo::detail_repo::TaskDetailRepository;
use crate::service::error::{normalize_required, BoardServiceError};

/// Task detail service facade.
pub struct TaskDetailService<R: TaskDetailRepository> {
    repo: R,
}

impl<R: TaskDetailRepository> TaskDetailService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_comment(
        &self,
        task_id: TaskId,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<TaskComment, BoardServiceError> {
        let author = normalize_required(author.into(), "comment author")?;
        let body = normalize_required(body.into(), "comment body")?;
        self.repo
            .add_comment(task_id, author.as_str(), body.as_str())
            .map_err(Into::into)
    }

    pub fn add_assignee(
        &self,
        task_id: TaskId,
        assignee: impl Into<String>,
    ) -> Result<(), BoardServiceError> {
        let assignee = normalize_required(assignee.into(), "assignee")?;
        self.repo
            .add_assignee(task_id, assignee.as_str())
            .map_err(Into::into)
    }

    pub fn add_attachment(
        &self,
        task_id: TaskId,
        file_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<TaskAttachment, BoardServiceError> {
        let file_name = normalize_required(file_name.into(), "attachment file name")?;
        let url = normalize_required(url.into(), "attachment url")?;
        self.repo
            .add_attachment(task_id, file_name.as_str(), url.as_str())
            .map_err(Into::into)
    }

    /// Appends one checklist line at the end of the task's checklist.
    pub fn add_checklist_item(
        &self,
        task_id: TaskId,
        label: impl Into<String>,
    ) -> Result<ChecklistItem, BoardServiceError> {
        let label = normalize_required(label.into(), "checklist label")?;
        self.repo
            .add_checklist_item(task_id, label.as_str())
            .map_err(Into::into)
    }

    pub fn checklist(&self, task_id: TaskId) -> Result<Vec<ChecklistItem>, BoardServiceError> {
        self.repo.checklist(task_id).map_err(Into::into)
    }

    pub fn detail_counts(&self, task_id: TaskId) -> Result<DetailCounts, BoardServiceError> {
        self.repo.detail_counts(task_id).map_err(Into::into)
    }
}
