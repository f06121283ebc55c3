//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository snapshots into authorization views.
//! - Own all logging around the pure tree/authz components.

pub mod view_service;
