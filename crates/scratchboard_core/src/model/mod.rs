//! Board domain model.
//!
//! # Responsibility
//! - Define the item kinds a board holds and the per-tab registry of them.
//!
//! # Invariants
//! - Item identity is runtime slot identity (`ItemId`), never content.
//! - Model types carry no persistence or ordering behavior.

pub mod item;
pub mod workspace;
