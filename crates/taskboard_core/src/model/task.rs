//! Task domain model.
//!
//! # Responsibility
//! - Define the card record ordered inside one list.
//! - Define the partial update shape for fields the position engine does not
//!   own.
//!
//! # Invariants
//! - `position` is 1-based and contiguous inside `list_id`.
//! - `tags` are lowercase, trimmed, unique and sorted.

use crate::model::list::ListId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Stable task identifier.
pub type TaskId = Uuid;

/// Task urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Stable storage/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Parses a storage/wire value, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// Task read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub list_id: ListId,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Epoch ms due date.
    pub due_at: Option<i64>,
    pub priority: TaskPriority,
    pub is_completed: bool,
    pub position: i64,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

/// Partial update of task domain fields.
///
/// `None` leaves a field untouched. Nullable fields use a nested `Option` so
/// `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub due_at: Option<Option<i64>>,
    pub priority: Option<TaskPriority>,
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    /// Returns whether applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.due_at.is_none()
            && self.priority.is_none()
            && self.is_completed.is_none()
    }
}

/// Normalizes tag input: trim, lowercase, drop blanks, dedupe, sort.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
