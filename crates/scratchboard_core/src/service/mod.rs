//! Board use-case services.
//!
//! # Responsibility
//! - Coordinate tabs, persistence write-through, and change notifications
//!   on top of the in-memory board engines.
//! - Keep UI/CLI callers decoupled from store details.

pub mod board_service;
