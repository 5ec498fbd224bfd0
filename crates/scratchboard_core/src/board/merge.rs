//! Import merge with structural de-duplication.
//!
//! # Responsibility
//! - Fold an external snapshot into a live workspace without duplicates.
//!
//! # Invariants
//! - Candidates are compared per kind against the live sequence, including
//!   candidates already accepted by the same merge.
//! - Equality keys: note `(content, header, posX, posY)`, task list
//!   `(header, posX, posY)`, image `(source, posX, posY)`.
//! - Draw orders are kept as imported; renumbering is the caller's choice.
//! - Accepted items get fresh ids and start unselected.

use crate::model::item::{new_item_id, Image, Note, TaskList};
use crate::model::workspace::Workspace;
use crate::snapshot::{decode, CodecError, Snapshot};

/// Merges `snapshot` into `workspace`. Returns the number of added items.
pub fn merge(workspace: &mut Workspace, snapshot: Snapshot) -> usize {
    let Snapshot {
        notes,
        task_lists,
        images,
    } = snapshot;
    let mut added = 0;

    for mut candidate in notes.unwrap_or_default() {
        if workspace.notes().iter().any(|live| same_note(live, &candidate)) {
            continue;
        }
        candidate.id = new_item_id();
        candidate.selected = false;
        workspace.push_note(candidate);
        added += 1;
    }

    for mut candidate in task_lists.unwrap_or_default() {
        if workspace
            .task_lists()
            .iter()
            .any(|live| same_task_list(live, &candidate))
        {
            continue;
        }
        candidate.id = new_item_id();
        candidate.selected = false;
        workspace.push_task_list(candidate);
        added += 1;
    }

    for mut candidate in images.unwrap_or_default() {
        if workspace.images().iter().any(|live| same_image(live, &candidate)) {
            continue;
        }
        candidate.id = new_item_id();
        candidate.selected = false;
        workspace.push_image(candidate);
        added += 1;
    }

    added
}

/// Decodes `text` and merges it. Nothing is applied when decoding fails.
pub fn merge_text(workspace: &mut Workspace, text: &str) -> Result<usize, CodecError> {
    let snapshot = decode(text)?;
    Ok(merge(workspace, snapshot))
}

fn same_note(live: &Note, candidate: &Note) -> bool {
    live.content == candidate.content
        && live.header == candidate.header
        && live.placement.same_position(&candidate.placement)
}

fn same_task_list(live: &TaskList, candidate: &TaskList) -> bool {
    live.header == candidate.header && live.placement.same_position(&candidate.placement)
}

fn same_image(live: &Image, candidate: &Image) -> bool {
    live.source == candidate.source && live.placement.same_position(&candidate.placement)
}
