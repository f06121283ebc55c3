//! Storage collaborators for the authorization views.
//!
//! # Responsibility
//! - Define the snapshot queries the views depend on.
//! - Isolate SQLite details from view orchestration.
//!
//! # Invariants
//! - Repository calls never mutate data.
//! - Missing rows are `None`/absent, not errors.

pub mod rbac_repo;
