//! Task sub-entity repository: comments, assignees, attachments, checklist.
//!
//! # Invariants
//! - Every insert checks its task and writes in one `BEGIN IMMEDIATE`
//!   transaction, so a task removed concurrently reports not-found.
//! - Checklist items are appended at `max(position) + 1` within their task.
//! - Assignees are unique per task; re-adding one is a no-op.

use crate::model::detail::{ChecklistItem, DetailCounts, TaskAttachment, TaskComment};
use crate::model::task::TaskId;
use crate::repo::error::{BoardRepoError, BoardRepoResult};
use crate::repo::schema::{ensure_connection_ready, parse_flag, parse_uuid};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Repository interface for task sub-entities.
pub trait TaskDetailRepository {
    fn add_comment(&self, task_id: TaskId, author: &str, body: &str)
        -> BoardRepoResult<TaskComment>;
    fn add_assignee(&self, task_id: TaskId, assignee: &str) -> BoardRepoResult<()>;
    fn add_attachment(
        &self,
        task_id: TaskId,
        file_name: &str,
        url: &str,
    ) -> BoardRepoResult<TaskAttachment>;
    fn add_checklist_item(&self, task_id: TaskId, label: &str) -> BoardRepoResult<ChecklistItem>;
    /// Lists checklist items of one task in position order.
    fn checklist(&self, task_id: TaskId) -> BoardRepoResult<Vec<ChecklistItem>>;
    /// Counts sub-entities of one task.
    fn detail_counts(&self, task_id: TaskId) -> BoardRepoResult<DetailCounts>;
}

/// SQLite-backed task detail repository.
pub struct SqliteTaskDetailRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskDetailRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> BoardRepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                "tasks",
                "task_comments",
                "task_assignees",
                "task_attachments",
                "task_checklist_items",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl TaskDetailRepository for SqliteTaskDetailRepository<'_> {
    fn add_comment(
        &self,
        task_id: TaskId,
        author: &str,
        body: &str,
    ) -> BoardRepoResult<TaskComment> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_task_exists(&tx, task_id)?;
        let id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO task_comments (uuid, task_uuid, author, body) VALUES (?1, ?2, ?3, ?4);",
            params![id.to_string(), task_id.to_string(), author, body],
        )?;
        let created_at = tx.query_row(
            "SELECT created_at FROM task_comments WHERE uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(TaskComment {
            id,
            task_id,
            author: author.to_string(),
            body: body.to_string(),
            created_at,
        })
    }

    fn add_assignee(&self, task_id: TaskId, assignee: &str) -> BoardRepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_task_exists(&tx, task_id)?;
        tx.execute(
            "INSERT OR IGNORE INTO task_assignees (task_uuid, assignee) VALUES (?1, ?2);",
            params![task_id.to_string(), assignee],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn add_attachment(
        &self,
        task_id: TaskId,
        file_name: &str,
        url: &str,
    ) -> BoardRepoResult<TaskAttachment> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_task_exists(&tx, task_id)?;
        let id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO task_attachments (uuid, task_uuid, file_name, url)
             VALUES (?1, ?2, ?3, ?4);",
            params![id.to_string(), task_id.to_string(), file_name, url],
        )?;
        let created_at = tx.query_row(
            "SELECT created_at FROM task_attachments WHERE uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(TaskAttachment {
            id,
            task_id,
            file_name: file_name.to_string(),
            url: url.to_string(),
            created_at,
        })
    }

    fn add_checklist_item(&self, task_id: TaskId, label: &str) -> BoardRepoResult<ChecklistItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_task_exists(&tx, task_id)?;

        let id = Uuid::new_v4();
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1
             FROM task_checklist_items
             WHERE task_uuid = ?1;",
            [task_id.to_string()],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO task_checklist_items (uuid, task_uuid, label, is_done, position)
             VALUES (?1, ?2, ?3, 0, ?4);",
            params![id.to_string(), task_id.to_string(), label, position],
        )?;
        let created_at = tx.query_row(
            "SELECT created_at FROM task_checklist_items WHERE uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        tx.commit()?;

        Ok(ChecklistItem {
            id,
            task_id,
            label: label.to_string(),
            is_done: false,
            position,
            created_at,
        })
    }

    fn checklist(&self, task_id: TaskId) -> BoardRepoResult<Vec<ChecklistItem>> {
        ensure_task_exists(self.conn, task_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT uuid, label, is_done, position, created_at
             FROM task_checklist_items
             WHERE task_uuid = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([task_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("uuid")?;
            items.push(ChecklistItem {
                id: parse_uuid(&id_text, "task_checklist_items.uuid")?,
                task_id,
                label: row.get("label")?,
                is_done: parse_flag(row.get("is_done")?, "task_checklist_items.is_done")?,
                position: row.get("position")?,
                created_at: row.get("created_at")?,
            });
        }
        Ok(items)
    }

    fn detail_counts(&self, task_id: TaskId) -> BoardRepoResult<DetailCounts> {
        let count = |table: &str| -> BoardRepoResult<usize> {
            let value: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {table} WHERE task_uuid = ?1;"),
                [task_id.to_string()],
                |row| row.get(0),
            )?;
            Ok(value as usize)
        };
        Ok(DetailCounts {
            comments: count("task_comments")?,
            assignees: count("task_assignees")?,
            attachments: count("task_attachments")?,
            checklist_items: count("task_checklist_items")?,
        })
    }
}

fn ensure_task_exists(conn: &Connection, task_id: TaskId) -> BoardRepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tasks WHERE uuid = ?1);",
        [task_id.to_string()],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(BoardRepoError::TaskNotFound(task_id));
    }
    Ok(())
}
