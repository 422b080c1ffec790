//! Board/list/task domain model.
//!
//! # Responsibility
//! - Define the records the position engine reads and returns.
//! - Keep position arithmetic free of storage concerns.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Positions are 1-based and contiguous per container.

pub mod board;
pub mod detail;
pub mod list;
pub mod position;
pub mod task;
