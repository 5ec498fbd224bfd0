//! In-memory board engines: draw order, selection, and import merge.
//!
//! # Responsibility
//! - Mutate one `Workspace` in place; persistence and tab switching live in
//!   `service::board_service`.
//!
//! # Invariants
//! - Operations naming an item that is not registered in the workspace fail
//!   with `UnregisteredItem` before mutating anything.
//! - After any ordering call, defined draw orders form the dense run `1..=k`.

use crate::model::item::ItemId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod merge;
pub mod ordering;
pub mod selection;

/// Precondition failure: the item is not registered in the active workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnregisteredItem(pub ItemId);

impl Display for UnregisteredItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "item is not registered in the active workspace: {}", self.0)
    }
}

impl Error for UnregisteredItem {}
