//! Container-scoped position updates.
//!
//! # Responsibility
//! - Issue the range `UPDATE`s that keep sibling positions contiguous.
//! - Hide which table/column a container maps to from the list and task
//!   repositories.
//!
//! # Invariants
//! - Every function runs on the caller's open transaction; none of them
//!   commits.
//! - Parked rows (`position < 1`) are never counted or shifted.

use crate::model::board::BoardId;
use crate::model::list::ListId;
use crate::model::position::{RangeShift, PARKED_POSITION};
use crate::repo::error::BoardRepoResult;
use rusqlite::{params, Connection};
use uuid::Uuid;

/// Scope inside which positions must be contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    /// Lists of one board.
    Board(BoardId),
    /// Tasks of one list.
    List(ListId),
}

impl Container {
    fn table(self) -> &'static str {
        match self {
            Self::Board(_) => "board_lists",
            Self::List(_) => "tasks",
        }
    }

    fn parent_column(self) -> &'static str {
        match self {
            Self::Board(_) => "board_uuid",
            Self::List(_) => "list_uuid",
        }
    }

    fn parent_key(self) -> String {
        match self {
            Self::Board(id) | Self::List(id) => id.to_string(),
        }
    }
}

/// Number of placed (non-parked) members.
pub(crate) fn member_count(conn: &Connection, container: Container) -> BoardRepoResult<i64> {
    let count = conn.query_row(
        &format!(
            "SELECT COUNT(*)
             FROM {table}
             WHERE {parent} = ?1
               AND position >= 1;",
            table = container.table(),
            parent = container.parent_column(),
        ),
        [container.parent_key()],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Highest placed position, or `0` for an empty container.
pub(crate) fn max_position(conn: &Connection, container: Container) -> BoardRepoResult<i64> {
    let max = conn.query_row(
        &format!(
            "SELECT COALESCE(MAX(position), 0)
             FROM {table}
             WHERE {parent} = ?1
               AND position >= 1;",
            table = container.table(),
            parent = container.parent_column(),
        ),
        [container.parent_key()],
        |row| row.get(0),
    )?;
    Ok(max)
}

/// Moves one member out of the contended range.
pub(crate) fn park(conn: &Connection, container: Container, row_id: Uuid) -> BoardRepoResult<()> {
    set_position(conn, container, row_id, PARKED_POSITION)
}

/// Writes one member's final position.
pub(crate) fn set_position(
    conn: &Connection,
    container: Container,
    row_id: Uuid,
    position: i64,
) -> BoardRepoResult<()> {
    conn.execute(
        &format!(
            "UPDATE {table}
             SET position = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            table = container.table(),
        ),
        params![row_id.to_string(), position],
    )?;
    Ok(())
}

/// Applies `shift.delta` to every member in `[shift.from, shift.to]`.
pub(crate) fn shift_range(
    conn: &Connection,
    container: Container,
    shift: RangeShift,
) -> BoardRepoResult<usize> {
    let changed = conn.execute(
        &format!(
            "UPDATE {table}
             SET position = position + ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE {parent} = ?1
               AND position BETWEEN ?3 AND ?4;",
            table = container.table(),
            parent = container.parent_column(),
        ),
        params![container.parent_key(), shift.delta, shift.from, shift.to],
    )?;
    Ok(changed)
}

/// Pulls every member after `removed_position` up by one.
pub(crate) fn close_gap(
    conn: &Connection,
    container: Container,
    removed_position: i64,
) -> BoardRepoResult<usize> {
    let changed = conn.execute(
        &format!(
            "UPDATE {table}
             SET position = position - 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE {parent} = ?1
               AND position > ?2;",
            table = container.table(),
            parent = container.parent_column(),
        ),
        params![container.parent_key(), removed_position],
    )?;
    Ok(changed)
}

/// Pushes every member at or after `inserted_position` down by one.
pub(crate) fn open_gap(
    conn: &Connection,
    container: Container,
    inserted_position: i64,
) -> BoardRepoResult<usize> {
    let changed = conn.execute(
        &format!(
            "UPDATE {table}
             SET position = position + 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE {parent} = ?1
               AND position >= ?2;",
            table = container.table(),
            parent = container.parent_column(),
        ),
        params![container.parent_key(), inserted_position],
    )?;
    Ok(changed)
}
