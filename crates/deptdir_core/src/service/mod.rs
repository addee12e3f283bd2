//! Directory use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations a routing layer needs.
//! - Keep callers decoupled from SQLite details.

pub mod directory_service;
