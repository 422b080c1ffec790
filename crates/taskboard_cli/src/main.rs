//! Command-line front end for the task board position engine.
//!
//! # Responsibility
//! - Drive every board/list/task operation against one SQLite file.
//! - Print authoritative records as JSON for scripting and smoke checks.
//!
//! Usage:
//!   taskboard --db board.db board create "Sprint 12"
//!   taskboard --db board.db list append <BOARD> Todo
//!   taskboard --db board.db list reorder <BOARD> <LIST> 3
//!   taskboard --db board.db task move <TASK> <LIST> --board <BOARD> --position 1
//!   taskboard --db board.db check <BOARD>

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use std::path::PathBuf;
use taskboard_core::db::open_db;
use taskboard_core::{
    init_logging, is_contiguous, BoardService, ListService, LogConfig, LogLevel,
    SqliteBoardRepository, SqliteListRepository, SqliteTaskDetailRepository,
    SqliteTaskRepository, TaskDetailService, TaskService,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(author, version, about = "Task board position engine CLI")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "TASKBOARD_DB", default_value = "taskboard.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "TASKBOARD_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error); defaults by build mode
    #[arg(long, env = "TASKBOARD_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Board management
    Board {
        #[command(subcommand)]
        action: BoardCommands,
    },
    /// List ordering
    List {
        #[command(subcommand)]
        action: ListCommands,
    },
    /// Task ordering
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Verify that list and task positions of a board are contiguous
    Check { board: Uuid },
}

#[derive(Subcommand)]
enum BoardCommands {
    Create { name: String },
    Show {
        /// Include inactive boards
        #[arg(long)]
        all: bool,
    },
    Close { board: Uuid },
    Reopen { board: Uuid },
}

#[derive(Subcommand)]
enum ListCommands {
    /// Append a list at the end of a board
    Append { board: Uuid, name: String },
    /// Move a list to a 1-based position
    Reorder {
        board: Uuid,
        list: Uuid,
        position: i64,
    },
    /// Delete a list together with its tasks
    Delete { list: Uuid },
    Rename { list: Uuid, name: String },
    /// Show the lists of a board in order
    Show { board: Uuid },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Append a task at the end of a list
    Append { list: Uuid, title: String },
    /// Move a task to a 1-based position inside its list
    Reorder { task: Uuid, position: i64 },
    /// Move a task to another list (end, or --position with --board)
    Move {
        task: Uuid,
        list: Uuid,
        #[arg(long, requires = "position")]
        board: Option<Uuid>,
        #[arg(long, requires = "board")]
        position: Option<i64>,
    },
    /// Mark a task completed
    Done { task: Uuid },
    /// Add a comment to a task
    Comment {
        task: Uuid,
        author: String,
        body: String,
    },
    /// Show the tasks of a list in order
    Show { list: Uuid },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.clone() {
        let level = cli.log_level.unwrap_or_else(LogLevel::for_build);
        let config = LogConfig::new(level, log_dir)?;
        init_logging(&config).context("failed to start logging")?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    info!("event=cli_start module=cli status=ok");

    let output = match cli.command {
        Commands::Board { action } => run_board(&conn, action)?,
        Commands::List { action } => run_list(&conn, action)?,
        Commands::Task { action } => run_task(&conn, action)?,
        Commands::Check { board } => run_check(&conn, board)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_board(conn: &rusqlite::Connection, action: BoardCommands) -> Result<serde_json::Value> {
    let service = BoardService::new(SqliteBoardRepository::try_new(conn)?);
    let value = match action {
        BoardCommands::Create { name } => json!(service.create_board(name)?),
        BoardCommands::Show { all } => json!(service.boards(all)?),
        BoardCommands::Close { board } => json!(service.close_board(board)?),
        BoardCommands::Reopen { board } => json!(service.reopen_board(board)?),
    };
    Ok(value)
}

fn run_list(conn: &rusqlite::Connection, action: ListCommands) -> Result<serde_json::Value> {
    let service = ListService::new(SqliteListRepository::try_new(conn)?);
    let value = match action {
        ListCommands::Append { board, name } => json!(service.append_list(board, name)?),
        ListCommands::Reorder {
            board,
            list,
            position,
        } => json!(service.reorder_list(board, list, position)?),
        ListCommands::Delete { list } => {
            let deleted = service.delete_list(list)?;
            json!({
                "list": deleted.list,
                "cascade": deleted.cascade,
                "shifted_siblings": deleted.shifted_siblings,
            })
        }
        ListCommands::Rename { list, name } => json!(service.rename_list(list, name)?),
        ListCommands::Show { board } => json!(service.lists(board)?),
    };
    Ok(value)
}

fn run_task(conn: &rusqlite::Connection, action: TaskCommands) -> Result<serde_json::Value> {
    let service = TaskService::new(SqliteTaskRepository::try_new(conn)?);
    let value = match action {
        TaskCommands::Append { list, title } => json!(service.append_task(list, title)?),
        TaskCommands::Reorder { task, position } => json!(service.reorder_task(task, position)?),
        TaskCommands::Move {
            task,
            list,
            board,
            position,
        } => match (board, position) {
            (Some(board), Some(position)) => {
                json!(service.move_task_at_position(board, task, list, position)?)
            }
            (None, None) => json!(service.move_task(task, list)?),
            _ => bail!("--board and --position must be given together"),
        },
        TaskCommands::Done { task } => json!(service.set_completed(task, true)?),
        TaskCommands::Comment { task, author, body } => {
            let details = TaskDetailService::new(SqliteTaskDetailRepository::try_new(conn)?);
            json!(details.add_comment(task, author, body)?)
        }
        TaskCommands::Show { list } => json!(service.tasks(list)?),
    };
    Ok(value)
}

fn run_check(conn: &rusqlite::Connection, board: Uuid) -> Result<serde_json::Value> {
    let boards = BoardService::new(SqliteBoardRepository::try_new(conn)?);
    let lists = ListService::new(SqliteListRepository::try_new(conn)?);
    let tasks = TaskService::new(SqliteTaskRepository::try_new(conn)?);

    boards.get_board(board)?;
    let board_lists = lists.lists(board)?;
    let mut broken = Vec::new();
    for list in &board_lists {
        let task_positions = tasks.tasks(list.id)?.into_iter().map(|task| task.position);
        if !is_contiguous(task_positions) {
            broken.push(list.id);
        }
    }
    let lists_ok = is_contiguous(board_lists.iter().map(|list| list.position));

    Ok(json!({
        "board_id": board,
        "lists": board_lists.len(),
        "lists_contiguous": lists_ok,
        "lists_with_task_gaps": broken,
    }))
}
