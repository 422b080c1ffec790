//! Board list repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own list `position` writes for every board: append, reorder, delete.
//! - Run each position mutation as one `BEGIN IMMEDIATE` transaction.
//!
//! # Invariants
//! - Lists of one board always hold positions `1..=N`.
//! - Listing is deterministic: `position ASC`.
//! - Validation failures are raised before the first write.

use crate::model::board::BoardId;
use crate::model::list::{BoardList, ListId};
use crate::model::position::{check_position, reorder_shift};
use crate::repo::board_repo::load_board;
use crate::repo::cascade::{delete_list_cascade, CascadeReport};
use crate::repo::error::{BoardRepoError, BoardRepoResult};
use crate::repo::ordering::{self, Container};
use crate::repo::schema::{ensure_connection_ready, parse_uuid};
use log::{debug, info};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::time::Instant;
use uuid::Uuid;

const LIST_SELECT_SQL: &str = "SELECT
    uuid,
    board_uuid,
    name,
    position,
    created_at,
    updated_at
FROM board_lists";

/// Result of a list delete: the removed record and what went with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedList {
    /// List as it was before deletion.
    pub list: BoardList,
    pub cascade: CascadeReport,
    /// Sibling lists whose position moved up by one.
    pub shifted_siblings: usize,
}

/// Repository interface for list ordering operations.
pub trait ListRepository {
    /// Appends one list at the end of its board.
    fn append_list(&self, board_id: BoardId, name: &str) -> BoardRepoResult<BoardList>;
    /// Loads one list by id.
    fn get_list(&self, list_id: ListId) -> BoardRepoResult<Option<BoardList>>;
    /// Lists the lists of one board in position order; the board must exist.
    fn lists_for_board(&self, board_id: BoardId) -> BoardRepoResult<Vec<BoardList>>;
    /// Renames one list without touching its position.
    fn rename_list(&self, list_id: ListId, name: &str) -> BoardRepoResult<BoardList>;
    /// Moves one list to `new_position`, shifting the siblings in between.
    fn reorder_list(
        &self,
        board_id: BoardId,
        list_id: ListId,
        new_position: i64,
    ) -> BoardRepoResult<BoardList>;
    /// Deletes one list with its tasks and closes the position gap.
    fn delete_list(&self, list_id: ListId) -> BoardRepoResult<DeletedList>;
}

/// SQLite-backed list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> BoardRepoResult<Self> {
        ensure_connection_ready(conn, &["boards", "board_lists", "tasks"])?;
        Ok(Self { conn })
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn append_list(&self, board_id: BoardId, name: &str) -> BoardRepoResult<BoardList> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if load_board(&tx, board_id)?.is_none() {
            return Err(BoardRepoError::BoardNotFound(board_id));
        }

        let list_id = Uuid::new_v4();
        let position = ordering::max_position(&tx, Container::Board(board_id))? + 1;
        tx.execute(
            "INSERT INTO board_lists (uuid, board_uuid, name, position)
             VALUES (?1, ?2, ?3, ?4);",
            params![list_id.to_string(), board_id.to_string(), name, position],
        )?;
        tx.commit()?;

        debug!(
            "event=list_append module=repo status=ok board_id={} list_id={} position={}",
            board_id, list_id, position
        );
        load_required_list(self.conn, list_id)
    }

    fn get_list(&self, list_id: ListId) -> BoardRepoResult<Option<BoardList>> {
        load_list(self.conn, list_id)
    }

    fn lists_for_board(&self, board_id: BoardId) -> BoardRepoResult<Vec<BoardList>> {
        if load_board(self.conn, board_id)?.is_none() {
            return Err(BoardRepoError::BoardNotFound(board_id));
        }
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL}
             WHERE board_uuid = ?1
             ORDER BY position ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([board_id.to_string()])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }
        Ok(lists)
    }

    fn rename_list(&self, list_id: ListId, name: &str) -> BoardRepoResult<BoardList> {
        let changed = self.conn.execute(
            "UPDATE board_lists
             SET name = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![list_id.to_string(), name],
        )?;
        if changed == 0 {
            return Err(BoardRepoError::ListNotFound(list_id));
        }
        load_required_list(self.conn, list_id)
    }

    fn reorder_list(
        &self,
        board_id: BoardId,
        list_id: ListId,
        new_position: i64,
    ) -> BoardRepoResult<BoardList> {
        let started_at = Instant::now();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let list = load_list(&tx, list_id)?.ok_or(BoardRepoError::ListNotFound(list_id))?;
        if list.board_id != board_id {
            return Err(BoardRepoError::CrossBoard { list_id, board_id });
        }

        let container = Container::Board(board_id);
        let list_count = ordering::member_count(&tx, container)?;
        check_position(new_position, list_count)?;

        let Some(shift) = reorder_shift(list.position, new_position) else {
            return Ok(list);
        };

        ordering::park(&tx, container, list_id)?;
        let shifted = ordering::shift_range(&tx, container, shift)?;
        ordering::set_position(&tx, container, list_id, new_position)?;
        tx.commit()?;

        info!(
            "event=list_reorder module=repo status=ok board_id={} list_id={} from={} to={} shifted={} duration_ms={}",
            board_id,
            list_id,
            list.position,
            new_position,
            shifted,
            started_at.elapsed().as_millis()
        );
        load_required_list(self.conn, list_id)
    }

    fn delete_list(&self, list_id: ListId) -> BoardRepoResult<DeletedList> {
        let started_at = Instant::now();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let list = load_list(&tx, list_id)?.ok_or(BoardRepoError::ListNotFound(list_id))?;
        let cascade = delete_list_cascade(&tx, list_id)?;
        let shifted_siblings =
            ordering::close_gap(&tx, Container::Board(list.board_id), list.position)?;
        tx.commit()?;

        info!(
            "event=list_delete module=repo status=ok board_id={} list_id={} position={} tasks={} details={} shifted={} duration_ms={}",
            list.board_id,
            list_id,
            list.position,
            cascade.tasks,
            cascade.details.total(),
            shifted_siblings,
            started_at.elapsed().as_millis()
        );
        Ok(DeletedList {
            list,
            cascade,
            shifted_siblings,
        })
    }
}

pub(crate) fn load_list(conn: &Connection, list_id: ListId) -> BoardRepoResult<Option<BoardList>> {
    let mut stmt = conn.prepare(&format!("{LIST_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([list_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_list_row(row)?));
    }
    Ok(None)
}

fn load_required_list(conn: &Connection, list_id: ListId) -> BoardRepoResult<BoardList> {
    load_list(conn, list_id)?.ok_or(BoardRepoError::ListNotFound(list_id))
}

fn parse_list_row(row: &Row<'_>) -> BoardRepoResult<BoardList> {
    let id_text: String = row.get("uuid")?;
    let board_text: String = row.get("board_uuid")?;
    Ok(BoardList {
        id: parse_uuid(&id_text, "board_lists.uuid")?,
        board_id: parse_uuid(&board_text, "board_lists.board_uuid")?,
        name: row.get("name")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
