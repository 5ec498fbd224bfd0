//! Draw-order engine shared by all item kinds.
//!
//! # Responsibility
//! - Hand out the next front-most draw order.
//! - Move one item to front/back or one rank forward/backward.
//! - Renumber defined draw orders into a dense ascending run.
//!
//! # Invariants
//! - `renormalize` is a stable sort over scan order (notes, task lists,
//!   images), so equal orders keep their scan order.
//! - Items without a draw order are never touched by `renormalize`.
//! - A forward/backward step is `STEP` followed by renormalization; from a
//!   dense run this crosses exactly one neighbor.

use crate::board::UnregisteredItem;
use crate::model::item::{ItemId, Placement};
use crate::model::workspace::Workspace;

/// Offset used by single-rank moves. Larger than one slot, smaller than two.
pub const STEP: f64 = 1.5;

/// Draw order assigned by `flip_to_back` before renumbering.
const BACK_ORDER: f64 = 0.0;

/// Returns `max(defined draw order) + 1`, or `1` when nothing is ordered yet.
pub fn next_order(workspace: &Workspace) -> f64 {
    workspace
        .placements()
        .filter_map(|placement| placement.pos_z)
        .reduce(f64::max)
        .map_or(1.0, |highest| highest + 1.0)
}

/// Renumbers every defined draw order to `1..=k`, keeping relative order.
pub fn renormalize(workspace: &mut Workspace) {
    let mut ordered: Vec<&mut Placement> = workspace
        .placements_mut()
        .filter(|placement| placement.pos_z.is_some())
        .collect();
    // Stable sort: equal orders keep scan order.
    ordered.sort_by(|a, b| draw_order(a).total_cmp(&draw_order(b)));
    for (rank, placement) in ordered.into_iter().enumerate() {
        placement.pos_z = Some((rank + 1) as f64);
    }
}

/// Places the item above every other item.
pub fn bring_to_front(workspace: &mut Workspace, id: ItemId) -> Result<(), UnregisteredItem> {
    let front = next_order(workspace);
    let placement = workspace.placement_mut(id).ok_or(UnregisteredItem(id))?;
    placement.pos_z = Some(front);
    renormalize(workspace);
    Ok(())
}

/// Moves the item one rank toward the front.
pub fn bring_forward(workspace: &mut Workspace, id: ItemId) -> Result<(), UnregisteredItem> {
    shift(workspace, id, STEP)
}

/// Moves the item one rank toward the back.
pub fn send_backward(workspace: &mut Workspace, id: ItemId) -> Result<(), UnregisteredItem> {
    shift(workspace, id, -STEP)
}

/// Places the item below every other item.
pub fn flip_to_back(workspace: &mut Workspace, id: ItemId) -> Result<(), UnregisteredItem> {
    let placement = workspace.placement_mut(id).ok_or(UnregisteredItem(id))?;
    placement.pos_z = Some(BACK_ORDER);
    renormalize(workspace);
    Ok(())
}

fn shift(workspace: &mut Workspace, id: ItemId, delta: f64) -> Result<(), UnregisteredItem> {
    let front = next_order(workspace);
    let placement = workspace.placement_mut(id).ok_or(UnregisteredItem(id))?;
    // Unordered items are first placed on top so the step has a reference.
    let current = placement.pos_z.unwrap_or(front);
    placement.pos_z = Some(current + delta);
    renormalize(workspace);
    Ok(())
}

fn draw_order(placement: &Placement) -> f64 {
    placement.pos_z.unwrap_or(BACK_ORDER)
}
