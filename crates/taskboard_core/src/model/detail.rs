//! Task sub-entities removed together with their task.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-text comment on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    pub id: Uuid,
    pub task_id: TaskId,
    pub author: String,
    pub body: String,
    pub created_at: i64,
}

/// File link attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAttachment {
    pub id: Uuid,
    pub task_id: TaskId,
    pub file_name: String,
    pub url: String,
    pub created_at: i64,
}

/// One checklist line; `position` is 1-based within its task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub task_id: TaskId,
    pub label: String,
    pub is_done: bool,
    pub position: i64,
    pub created_at: i64,
}

/// Number of dependent rows per sub-entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailCounts {
    pub comments: usize,
    pub assignees: usize,
    pub attachments: usize,
    pub checklist_items: usize,
}

impl DetailCounts {
    pub fn total(&self) -> usize {
        self.comments + self.assignees + self.attachments + self.checklist_items
    }
}
