//! Repository layer: SQLite persistence and the position engine.
//!
//! # Responsibility
//! - Define storage contracts for boards, lists, tasks and task details.
//! - Keep SQL and transaction boundaries out of the service layer.
//!
//! # Invariants
//! - Every position mutation is one `BEGIN IMMEDIATE` transaction; errors
//!   drop the transaction and roll back every write.
//! - Repository APIs return semantic errors (`*NotFound`, `Position`,
//!   `CrossBoard`) in addition to storage errors.

pub mod board_repo;
pub mod cascade;
pub mod detail_repo;
pub mod error;
pub mod list_repo;
mod ordering;
mod schema;
pub mod task_repo;
