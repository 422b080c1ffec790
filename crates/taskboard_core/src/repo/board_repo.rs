//! Board repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the board containers that own ordered lists.
//!
//! # Invariants
//! - Boards are never hard-deleted; closing a board only flips `status`.
//! - Board listing is deterministic: `created_at ASC, uuid ASC`.

use crate::model::board::{Board, BoardId, BoardStatus};
use crate::repo::error::{BoardRepoError, BoardRepoResult};
use crate::repo::schema::{ensure_connection_ready, parse_uuid};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const BOARD_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    status,
    created_at,
    updated_at
FROM boards";

/// Repository interface for board operations.
pub trait BoardRepository {
    /// Creates one active board.
    fn create_board(&self, name: &str) -> BoardRepoResult<Board>;
    /// Loads one board by id.
    fn get_board(&self, board_id: BoardId) -> BoardRepoResult<Option<Board>>;
    /// Lists all boards, optionally including inactive ones.
    fn list_boards(&self, include_inactive: bool) -> BoardRepoResult<Vec<Board>>;
    /// Renames one board.
    fn rename_board(&self, board_id: BoardId, name: &str) -> BoardRepoResult<Board>;
    /// Sets the lifecycle status of one board.
    fn set_board_status(&self, board_id: BoardId, status: BoardStatus)
        -> BoardRepoResult<Board>;
}

/// SQLite-backed board repository.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> BoardRepoResult<Self> {
        ensure_connection_ready(conn, &["boards"])?;
        Ok(Self { conn })
    }
}

impl BoardRepository for SqliteBoardRepository<'_> {
    fn create_board(&self, name: &str) -> BoardRepoResult<Board> {
        let board_id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO boards (uuid, name, status) VALUES (?1, ?2, 'active');",
            params![board_id.to_string(), name],
        )?;
        load_required_board(self.conn, board_id)
    }

    fn get_board(&self, board_id: BoardId) -> BoardRepoResult<Option<Board>> {
        load_board(self.conn, board_id)
    }

    fn list_boards(&self, include_inactive: bool) -> BoardRepoResult<Vec<Board>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOARD_SELECT_SQL}
             WHERE (?1 = 1 OR status = 'active')
             ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([i64::from(include_inactive)])?;
        let mut boards = Vec::new();
        while let Some(row) = rows.next()? {
            boards.push(parse_board_row(row)?);
        }
        Ok(boards)
    }

    fn rename_board(&self, board_id: BoardId, name: &str) -> BoardRepoResult<Board> {
        let changed = self.conn.execute(
            "UPDATE boards
             SET name = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![board_id.to_string(), name],
        )?;
        if changed == 0 {
            return Err(BoardRepoError::BoardNotFound(board_id));
        }
        load_required_board(self.conn, board_id)
    }

    fn set_board_status(
        &self,
        board_id: BoardId,
        status: BoardStatus,
    ) -> BoardRepoResult<Board> {
        let changed = self.conn.execute(
            "UPDATE boards
             SET status = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![board_id.to_string(), status.as_str()],
        )?;
        if changed == 0 {
            return Err(BoardRepoError::BoardNotFound(board_id));
        }
        load_required_board(self.conn, board_id)
    }
}

pub(crate) fn load_board(conn: &Connection, board_id: BoardId) -> BoardRepoResult<Option<Board>> {
    let mut stmt = conn.prepare(&format!("{BOARD_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([board_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_board_row(row)?));
    }
    Ok(None)
}

fn load_required_board(conn: &Connection, board_id: BoardId) -> BoardRepoResult<Board> {
    load_board(conn, board_id)?.ok_or(BoardRepoError::BoardNotFound(board_id))
}

fn parse_board_row(row: &Row<'_>) -> BoardRepoResult<Board> {
    let id_text: String = row.get("uuid")?;
    let status_text: String = row.get("status")?;
    let status = BoardStatus::parse(&status_text).ok_or_else(|| {
        BoardRepoError::InvalidData(format!(
            "invalid board status `{status_text}` in boards.status"
        ))
    })?;

    Ok(Board {
        id: parse_uuid(&id_text, "boards.uuid")?,
        name: row.get("name")?,
        status,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
