//! Use-case services over the repository layer.
//!
//! # Responsibility
//! - Validate caller input before any transaction opens.
//! - Map repository failures onto [`error::ErrorKind`] categories.
//! - Stay stateless: each service only wraps a repository handle.

pub mod board_service;
pub mod detail_service;
pub mod error;
pub mod list_service;
pub mod task_service;
