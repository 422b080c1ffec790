//! Board list domain model.

use crate::model::board::BoardId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable list identifier.
pub type ListId = Uuid;

/// One ordered column of a board.
///
/// `position` is 1-based and owned by the position engine; within one board
/// the positions of all lists form `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: ListId,
    pub board_id: BoardId,
    pub name: String,
    pub position: i64,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}
