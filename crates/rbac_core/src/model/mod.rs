//! Record model consumed by the authorization-view components.
//!
//! # Responsibility
//! - Define the flat, parent-referencing records read from storage snapshots.
//! - Define role/user membership records used for permission resolution.
//!
//! # Invariants
//! - Records are immutable snapshots for the duration of one resolution call.
//! - Node identity is `id`; `parent_id = None` marks a top-level node.

pub mod dept;
pub mod ids;
pub mod menu;
pub mod record;
pub mod role;
