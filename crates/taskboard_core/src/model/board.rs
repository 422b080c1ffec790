//! Board domain model.
//!
//! # Responsibility
//! - Define the top-level container that owns ordered lists.
//!
//! # Invariants
//! - `id` is stable and never reused for another board.
//! - Closing a board flips `status` to `Inactive`; boards are never deleted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable board identifier.
pub type BoardId = Uuid;

/// Board lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardStatus {
    /// Open for work.
    Active,
    /// Soft-closed by an administrator.
    Inactive,
}

impl BoardStatus {
    /// Stable storage/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parses a storage/wire value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Board read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub status: BoardStatus,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Board {
    /// Returns whether the board has not been soft-closed.
    pub fn is_active(&self) -> bool {
        self.status == BoardStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::BoardStatus;

    #[test]
    fn status_round_trips_through_storage_value() {
        for status in [BoardStatus::Active, BoardStatus::Inactive] {
            assert_eq!(BoardStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BoardStatus::parse("archived"), None);
    }
}
