//! Cross-kind selection tracking.
//!
//! # Responsibility
//! - Keep one selection sequence per item kind, keyed by item identity.
//! - Maintain `selected_count` in lockstep with the sequences.
//!
//! # Invariants
//! - An id appears at most once; repeated select calls never double count.
//! - Deselecting an absent id never changes the count.
//! - Sequences keep selection order.

use crate::board::UnregisteredItem;
use crate::model::item::{ItemId, ItemKind};
use crate::model::workspace::Workspace;

/// Selection state scoped to the active workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    notes: Vec<ItemId>,
    task_lists: Vec<ItemId>,
    images: Vec<ItemId>,
    selected_count: usize,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (`on = true`) or removes (`on = false`) one id.
    ///
    /// Returns whether the selection changed.
    pub fn select(&mut self, kind: ItemKind, id: ItemId, on: bool) -> bool {
        let selected_count = &mut self.selected_count;
        let ids = match kind {
            ItemKind::Note => &mut self.notes,
            ItemKind::TaskList => &mut self.task_lists,
            ItemKind::Image => &mut self.images,
        };

        let present = ids.contains(&id);
        match (on, present) {
            (true, false) => {
                ids.push(id);
                *selected_count += 1;
                true
            }
            (false, true) => {
                ids.retain(|x| *x != id);
                *selected_count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Selects or deselects a registered item and mirrors its `selected` flag.
    ///
    /// # Errors
    /// - Returns `UnregisteredItem` when `id` is not in `workspace`.
    pub fn apply(
        &mut self,
        workspace: &mut Workspace,
        id: ItemId,
        on: bool,
    ) -> Result<bool, UnregisteredItem> {
        let kind = workspace.kind_of(id).ok_or(UnregisteredItem(id))?;
        let changed = self.select(kind, id, on);
        workspace.set_selected(id, on);
        Ok(changed)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.notes.contains(&id) || self.task_lists.contains(&id) || self.images.contains(&id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected_count
    }

    pub fn is_any_selected(&self) -> bool {
        self.selected_count > 0
    }

    pub fn notes(&self) -> &[ItemId] {
        &self.notes
    }

    pub fn task_lists(&self) -> &[ItemId] {
        &self.task_lists
    }

    pub fn images(&self) -> &[ItemId] {
        &self.images
    }

    pub fn clear(&mut self) {
        self.notes.clear();
        self.task_lists.clear();
        self.images.clear();
        self.selected_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;
    use crate::model::item::{new_item_id, ItemKind, Note};
    use crate::model::workspace::Workspace;

    #[test]
    fn repeated_select_does_not_double_count() {
        let mut selection = Selection::new();
        let id = new_item_id();

        assert!(selection.select(ItemKind::Note, id, true));
        assert!(!selection.select(ItemKind::Note, id, true));
        assert_eq!(selection.selected_count(), 1);
        assert_eq!(selection.notes(), &[id]);
    }

    #[test]
    fn deselect_absent_item_keeps_count_at_zero() {
        let mut selection = Selection::new();

        assert!(!selection.select(ItemKind::Image, new_item_id(), false));
        assert_eq!(selection.selected_count(), 0);
        assert!(!selection.is_any_selected());
    }

    #[test]
    fn count_follows_mixed_kinds() {
        let mut selection = Selection::new();
        let note = new_item_id();
        let list = new_item_id();
        let image = new_item_id();

        selection.select(ItemKind::Note, note, true);
        selection.select(ItemKind::TaskList, list, true);
        selection.select(ItemKind::Image, image, true);
        selection.select(ItemKind::TaskList, list, false);
        selection.select(ItemKind::TaskList, list, false);

        assert_eq!(selection.selected_count(), 2);
        assert!(selection.contains(note));
        assert!(!selection.contains(list));
        assert!(selection.contains(image));

        selection.clear();
        assert_eq!(selection.selected_count(), 0);
        assert!(selection.images().is_empty());
    }

    #[test]
    fn apply_mirrors_flag_and_rejects_unknown_items() {
        let mut workspace = Workspace::new();
        let note = Note::new("a", 0.0, 0.0);
        let id = note.id;
        workspace.push_note(note);
        let mut selection = Selection::new();

        assert!(selection.apply(&mut workspace, id, true).unwrap());
        assert!(workspace.notes()[0].selected);

        let stranger = new_item_id();
        let err = selection.apply(&mut workspace, stranger, true).unwrap_err();
        assert_eq!(err.0, stranger);
        assert_eq!(selection.selected_count(), 1);
    }
}
