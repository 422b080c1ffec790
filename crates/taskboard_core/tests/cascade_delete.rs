use taskboard_core::db::open_db_in_memory;
use taskboard_core::{
    BoardList, BoardService, CascadeReport, DetailCounts, ErrorKind, ListService,
    SqliteBoardRepository, SqliteListRepository, SqliteTaskDetailRepository,
    SqliteTaskRepository, TaskDetailService, TaskPatch, TaskService,
};

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn board_with_lists(conn: &rusqlite::Connection, names: &[&str]) -> Vec<BoardList> {
    let boards = BoardService::new(SqliteBoardRepository::try_new(conn).unwrap());
    let lists = ListService::new(SqliteListRepository::try_new(conn).unwrap());
    let board = boards.create_board("Board").unwrap();
    names
        .iter()
        .map(|name| lists.append_list(board.id, *name).unwrap())
        .collect()
}

fn row_count(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn delete_list_removes_tasks_details_and_closes_gap() {
    let conn = setup();
    let lists = board_with_lists(&conn, &["A", "B", "C", "D"]);
    let list_service = ListService::new(SqliteListRepository::try_new(&conn).unwrap());
    let task_service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let details = TaskDetailService::new(SqliteTaskDetailRepository::try_new(&conn).unwrap());

    // K = 3 tasks with details on B; one survivor task on C.
    for title in ["b1", "b2", "b3"] {
        let task = task_service.append_task(lists[1].id, title).unwrap();
        details.add_comment(task.id, "ana", "looks good").unwrap();
        details.add_assignee(task.id, "ana").unwrap();
        details
            .add_attachment(task.id, "design.pdf", "https://files.example/design.pdf")
            .unwrap();
        details.add_checklist_item(task.id, "review").unwrap();
        details.add_checklist_item(task.id, "merge").unwrap();
    }
    let survivor = task_service.append_task(lists[2].id, "c1").unwrap();
    details.add_comment(survivor.id, "bo", "keep me").unwrap();

    let deleted = list_service.delete_list(lists[1].id).unwrap();
    assert_eq!(deleted.list, lists[1]);
    assert_eq!(deleted.cascade.tasks, 3);
    assert_eq!(deleted.cascade.details.comments, 3);
    assert_eq!(deleted.cascade.details.assignees, 3);
    assert_eq!(deleted.cascade.details.attachments, 3);
    assert_eq!(deleted.cascade.details.checklist_items, 6);
    assert_eq!(deleted.shifted_siblings, 2);

    assert_eq!(row_count(&conn, "tasks"), 1);
    assert_eq!(row_count(&conn, "task_comments"), 1);
    assert_eq!(row_count(&conn, "task_assignees"), 0);
    assert_eq!(row_count(&conn, "task_attachments"), 0);
    assert_eq!(row_count(&conn, "task_checklist_items"), 0);

    let remaining = list_service.lists(lists[0].board_id).unwrap();
    let summary: Vec<(String, i64)> = remaining
        .iter()
        .map(|list| (list.name.clone(), list.position))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("A".to_string(), 1),
            ("C".to_string(), 2),
            ("D".to_string(), 3)
        ]
    );
    assert_eq!(remaining[0], lists[0]);
    assert_eq!(task_service.get_task(survivor.id).unwrap().position, 1);
}

#[test]
fn delete_list_removes_task_tags() {
    let conn = setup();
    let lists = board_with_lists(&conn, &["A"]);
    let list_service = ListService::new(SqliteListRepository::try_new(&conn).unwrap());
    let task_service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let task = task_service.append_task(lists[0].id, "tagged").unwrap();
    task_service
        .update_task(
            task.id,
            TaskPatch {
                tags: Some(vec!["bug".to_string(), "ui".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();

    let deleted = list_service.delete_list(lists[0].id).unwrap();
    assert_eq!(deleted.cascade.tags, 2);
    assert_eq!(deleted.shifted_siblings, 0);
    assert_eq!(row_count(&conn, "task_tags"), 0);
    assert!(list_service.lists(lists[0].board_id).unwrap().is_empty());
}

#[test]
fn cascade_report_counts_each_dependent_kind_separately() {
    let conn = setup();
    let lists = board_with_lists(&conn, &["A"]);
    let list_service = ListService::new(SqliteListRepository::try_new(&conn).unwrap());
    let task_service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let details = TaskDetailService::new(SqliteTaskDetailRepository::try_new(&conn).unwrap());

    let task = task_service.append_task(lists[0].id, "busy").unwrap();
    details.add_comment(task.id, "ana", "first").unwrap();
    for assignee in ["ana", "bo"] {
        details.add_assignee(task.id, assignee).unwrap();
    }
    for n in 0..3 {
        details
            .add_attachment(task.id, format!("f{n}.txt"), "https://files.example/f")
            .unwrap();
    }
    for label in ["a", "b", "c", "d"] {
        details.add_checklist_item(task.id, label).unwrap();
    }
    task_service
        .update_task(
            task.id,
            TaskPatch {
                tags: Some(["t1", "t2", "t3", "t4", "t5"].map(String::from).to_vec()),
                ..Default::default()
            },
        )
        .unwrap();

    let deleted = list_service.delete_list(lists[0].id).unwrap();
    assert_eq!(
        deleted.cascade,
        CascadeReport {
            tasks: 1,
            tags: 5,
            details: DetailCounts {
                comments: 1,
                assignees: 2,
                attachments: 3,
                checklist_items: 4,
            },
        }
    );
}

#[test]
fn delete_missing_list_is_not_found() {
    let conn = setup();
    let lists = board_with_lists(&conn, &["A", "B"]);
    let list_service = ListService::new(SqliteListRepository::try_new(&conn).unwrap());

    let err = list_service.delete_list(uuid::Uuid::new_v4()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(list_service.lists(lists[0].board_id).unwrap(), lists);
}

#[test]
fn failed_cascade_rolls_back_everything() {
    let conn = setup();
    let lists = board_with_lists(&conn, &["A", "B"]);
    let list_service = ListService::new(SqliteListRepository::try_new(&conn).unwrap());
    let task_service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    task_service.append_task(lists[0].id, "a1").unwrap();

    // Make the final list-row delete fail after tasks were already removed.
    conn.execute_batch(
        "CREATE TRIGGER block_list_delete
         BEFORE DELETE ON board_lists
         BEGIN
             SELECT RAISE(ABORT, 'list delete blocked');
         END;",
    )
    .unwrap();

    let err = list_service.delete_list(lists[0].id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);

    assert_eq!(list_service.lists(lists[0].board_id).unwrap(), lists);
    assert_eq!(task_service.tasks(lists[0].id).unwrap().len(), 1);
}
