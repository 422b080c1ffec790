//! Cascade deletion of a list and everything hanging off its tasks.
//!
//! # Responsibility
//! - Remove a list's dependents in foreign-key order: comments, assignees,
//!   attachments, checklist items, tags, tasks, then the list row itself.
//!
//! # Invariants
//! - Runs on the caller's open transaction and never commits, so gap closure
//!   and cascade succeed or roll back together.
//! - Does not touch sibling list positions; the caller closes the gap.

use crate::model::detail::DetailCounts;
use crate::model::list::ListId;
use crate::repo::error::{BoardRepoError, BoardRepoResult};
use rusqlite::Connection;
use serde::Serialize;

/// Rows removed by one list cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub tasks: usize,
    pub tags: usize,
    pub details: DetailCounts,
}

type CountSlot = fn(&mut CascadeReport, usize);

/// Per-task dependent tables in deletion order, each with its report slot.
const TASK_DEPENDENTS: [(&str, CountSlot); 5] = [
    ("task_comments", |report, n| report.details.comments = n),
    ("task_assignees", |report, n| report.details.assignees = n),
    ("task_attachments", |report, n| report.details.attachments = n),
    ("task_checklist_items", |report, n| {
        report.details.checklist_items = n
    }),
    ("task_tags", |report, n| report.tags = n),
];

/// Deletes `list_id`, its tasks and all their sub-entities.
pub(crate) fn delete_list_cascade(
    conn: &Connection,
    list_id: ListId,
) -> BoardRepoResult<CascadeReport> {
    let key = list_id.to_string();
    let mut report = CascadeReport::default();

    for (table, record) in TASK_DEPENDENTS {
        let removed = conn.execute(
            &format!(
                "DELETE FROM {table}
                 WHERE task_uuid IN (
                     SELECT uuid FROM tasks WHERE list_uuid = ?1
                 );"
            ),
            [&key],
        )?;
        record(&mut report, removed);
    }

    report.tasks = conn.execute("DELETE FROM tasks WHERE list_uuid = ?1;", [&key])?;

    let removed_lists = conn.execute("DELETE FROM board_lists WHERE uuid = ?1;", [&key])?;
    if removed_lists == 0 {
        return Err(BoardRepoError::ListNotFound(list_id));
    }
    Ok(report)
}
