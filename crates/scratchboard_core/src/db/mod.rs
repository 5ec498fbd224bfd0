//! SQLite bootstrap for the board key-value store.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `store::SqliteKvStore`.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Store adapters must not read/write entries before migrations succeed.
//! - Failures surface as `store::StoreError`; the bootstrap has no error
//!   type of its own.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
