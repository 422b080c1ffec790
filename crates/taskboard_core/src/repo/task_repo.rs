//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own task `position` writes: append, reorder within a list, and moves
//!   between lists (append or explicit slot, optionally board-scoped).
//! - Persist task domain fields without touching positions.
//!
//! # Invariants
//! - Tasks of one list always hold positions `1..=M`.
//! - A move re-establishes contiguity in both source and destination inside
//!   one `BEGIN IMMEDIATE` transaction.
//! - Validation failures are raised before the first write.

use crate::model::board::BoardId;
use crate::model::list::ListId;
use crate::model::position::{check_position, reorder_shift};
use crate::model::task::{normalize_tags, Task, TaskId, TaskPatch, TaskPriority};
use crate::repo::error::{BoardRepoError, BoardRepoResult};
use crate::repo::list_repo::load_list;
use crate::repo::ordering::{self, Container};
use crate::repo::schema::{bool_to_int, ensure_connection_ready, parse_flag, parse_uuid};
use log::{debug, info};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::time::Instant;
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    list_uuid,
    title,
    description,
    due_at,
    priority,
    is_completed,
    position,
    created_at,
    updated_at
FROM tasks";

/// One task move request.
///
/// `position = None` appends at the end of the destination. `board_scope`
/// requires both source and destination lists to belong to that board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMove {
    pub task_id: TaskId,
    pub destination: ListId,
    pub position: Option<i64>,
    pub board_scope: Option<BoardId>,
}

/// Repository interface for task ordering operations.
pub trait TaskRepository {
    /// Appends one task at the end of its list.
    fn append_task(&self, list_id: ListId, title: &str) -> BoardRepoResult<Task>;
    /// Loads one task by id.
    fn get_task(&self, task_id: TaskId) -> BoardRepoResult<Option<Task>>;
    /// Lists the tasks of one list in position order; the list must exist.
    fn tasks_for_list(&self, list_id: ListId) -> BoardRepoResult<Vec<Task>>;
    /// Moves one task to `new_position` inside its current list.
    fn reorder_task(&self, task_id: TaskId, new_position: i64) -> BoardRepoResult<Task>;
    /// Moves one task to another (or the same) list.
    fn move_task(&self, request: &TaskMove) -> BoardRepoResult<Task>;
    /// Applies a domain-field patch; positions are left untouched.
    fn update_task(&self, task_id: TaskId, patch: &TaskPatch) -> BoardRepoResult<Task>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> BoardRepoResult<Self> {
        ensure_connection_ready(conn, &["board_lists", "tasks", "task_tags"])?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn append_task(&self, list_id: ListId, title: &str) -> BoardRepoResult<Task> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if load_list(&tx, list_id)?.is_none() {
            return Err(BoardRepoError::ListNotFound(list_id));
        }

        let task_id = Uuid::new_v4();
        let position = ordering::member_count(&tx, Container::List(list_id))? + 1;
        tx.execute(
            "INSERT INTO tasks (uuid, list_uuid, title, priority, is_completed, position)
             VALUES (?1, ?2, ?3, ?4, 0, ?5);",
            params![
                task_id.to_string(),
                list_id.to_string(),
                title,
                TaskPriority::default().as_str(),
                position,
            ],
        )?;
        tx.commit()?;

        debug!(
            "event=task_append module=repo status=ok list_id={} task_id={} position={}",
            list_id, task_id, position
        );
        load_required_task(self.conn, task_id)
    }

    fn get_task(&self, task_id: TaskId) -> BoardRepoResult<Option<Task>> {
        load_task(self.conn, task_id)
    }

    fn tasks_for_list(&self, list_id: ListId) -> BoardRepoResult<Vec<Task>> {
        if load_list(self.conn, list_id)?.is_none() {
            return Err(BoardRepoError::ListNotFound(list_id));
        }
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE list_uuid = ?1
             ORDER BY position ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([list_id.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        for task in &mut tasks {
            task.tags = load_tags(self.conn, task.id)?;
        }
        Ok(tasks)
    }

    fn reorder_task(&self, task_id: TaskId, new_position: i64) -> BoardRepoResult<Task> {
        let started_at = Instant::now();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let task = load_task(&tx, task_id)?.ok_or(BoardRepoError::TaskNotFound(task_id))?;
        let container = Container::List(task.list_id);
        let task_count = ordering::member_count(&tx, container)?;
        check_position(new_position, task_count)?;

        let Some(shift) = reorder_shift(task.position, new_position) else {
            return Ok(task);
        };

        ordering::park(&tx, container, task_id)?;
        let shifted = ordering::shift_range(&tx, container, shift)?;
        ordering::set_position(&tx, container, task_id, new_position)?;
        tx.commit()?;

        info!(
            "event=task_reorder module=repo status=ok list_id={} task_id={} from={} to={} shifted={} duration_ms={}",
            task.list_id,
            task_id,
            task.position,
            new_position,
            shifted,
            started_at.elapsed().as_millis()
        );
        load_required_task(self.conn, task_id)
    }

    fn move_task(&self, request: &TaskMove) -> BoardRepoResult<Task> {
        let started_at = Instant::now();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let task = load_task(&tx, request.task_id)?
            .ok_or(BoardRepoError::TaskNotFound(request.task_id))?;
        let source = load_list(&tx, task.list_id)?
            .ok_or(BoardRepoError::ListNotFound(task.list_id))?;
        let destination = load_list(&tx, request.destination)?
            .ok_or(BoardRepoError::ListNotFound(request.destination))?;

        if let Some(board_id) = request.board_scope {
            for list in [&source, &destination] {
                if list.board_id != board_id {
                    return Err(BoardRepoError::CrossBoard {
                        list_id: list.id,
                        board_id,
                    });
                }
            }
        }

        let same_list = source.id == destination.id;
        let source_container = Container::List(source.id);
        let destination_container = Container::List(destination.id);

        // Slots available once the moving task has left its source.
        let destination_size = if same_list {
            ordering::member_count(&tx, source_container)? - 1
        } else {
            ordering::member_count(&tx, destination_container)?
        };
        let target = request.position.unwrap_or(destination_size + 1);
        check_position(target, destination_size + 1)?;

        if same_list && target == task.position {
            return Ok(task);
        }

        ordering::park(&tx, source_container, task.id)?;
        let closed = ordering::close_gap(&tx, source_container, task.position)?;
        let opened = ordering::open_gap(&tx, destination_container, target)?;
        tx.execute(
            "UPDATE tasks
             SET list_uuid = ?2,
                 position = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![task.id.to_string(), destination.id.to_string(), target],
        )?;
        tx.commit()?;

        info!(
            "event=task_move module=repo status=ok task_id={} from_list={} from={} to_list={} to={} closed={} opened={} scoped={} duration_ms={}",
            task.id,
            source.id,
            task.position,
            destination.id,
            target,
            closed,
            opened,
            request.board_scope.is_some(),
            started_at.elapsed().as_millis()
        );
        load_required_task(self.conn, task.id)
    }

    fn update_task(&self, task_id: TaskId, patch: &TaskPatch) -> BoardRepoResult<Task> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut task = load_task(&tx, task_id)?.ok_or(BoardRepoError::TaskNotFound(task_id))?;

        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(due_at) = patch.due_at {
            task.due_at = due_at;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(is_completed) = patch.is_completed {
            task.is_completed = is_completed;
        }

        tx.execute(
            "UPDATE tasks
             SET title = ?2,
                 description = ?3,
                 due_at = ?4,
                 priority = ?5,
                 is_completed = ?6,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                task_id.to_string(),
                task.title.as_str(),
                task.description.as_deref(),
                task.due_at,
                task.priority.as_str(),
                bool_to_int(task.is_completed),
            ],
        )?;

        if let Some(tags) = &patch.tags {
            tx.execute(
                "DELETE FROM task_tags WHERE task_uuid = ?1;",
                [task_id.to_string()],
            )?;
            for tag in normalize_tags(tags) {
                tx.execute(
                    "INSERT INTO task_tags (task_uuid, tag) VALUES (?1, ?2);",
                    params![task_id.to_string(), tag],
                )?;
            }
        }
        tx.commit()?;

        load_required_task(self.conn, task_id)
    }
}

fn load_task(conn: &Connection, task_id: TaskId) -> BoardRepoResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([task_id.to_string()])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let mut task = parse_task_row(row)?;
    task.tags = load_tags(conn, task_id)?;
    Ok(Some(task))
}

fn load_required_task(conn: &Connection, task_id: TaskId) -> BoardRepoResult<Task> {
    load_task(conn, task_id)?.ok_or(BoardRepoError::TaskNotFound(task_id))
}

fn load_tags(conn: &Connection, task_id: TaskId) -> BoardRepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM task_tags
         WHERE task_uuid = ?1
         ORDER BY tag ASC;",
    )?;
    let mut rows = stmt.query([task_id.to_string()])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn parse_task_row(row: &Row<'_>) -> BoardRepoResult<Task> {
    let id_text: String = row.get("uuid")?;
    let list_text: String = row.get("list_uuid")?;
    let priority_text: String = row.get("priority")?;
    let priority = TaskPriority::parse(&priority_text).ok_or_else(|| {
        BoardRepoError::InvalidData(format!(
            "invalid task priority `{priority_text}` in tasks.priority"
        ))
    })?;

    Ok(Task {
        id: parse_uuid(&id_text, "tasks.uuid")?,
        list_id: parse_uuid(&list_text, "tasks.list_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        tags: Vec::new(),
        due_at: row.get("due_at")?,
        priority,
        is_completed: parse_flag(row.get("is_completed")?, "tasks.is_completed")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
