//! Per-tab item registry.
//!
//! # Responsibility
//! - Hold the note, task list, and image sequences of one board tab.
//! - Provide identity-based lookup and removal across all three kinds.
//!
//! # Invariants
//! - `item_count` always equals the sum of the three sequence lengths; every
//!   insert/remove goes through this type and updates it in the same call.
//! - Cross-kind scan order is notes, then task lists, then images.

use crate::model::item::{Image, Item, ItemId, ItemKind, ItemStyle, Note, Placement, TaskList};

/// Items of one board tab.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    notes: Vec<Note>,
    task_lists: Vec<TaskList>,
    images: Vec<Image>,
    item_count: usize,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn task_lists(&self) -> &[TaskList] {
        &self.task_lists
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Total items across all kinds.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    pub fn push(&mut self, item: Item) {
        match item {
            Item::Note(note) => self.push_note(note),
            Item::TaskList(list) => self.push_task_list(list),
            Item::Image(image) => self.push_image(image),
        }
    }

    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
        self.item_count += 1;
    }

    pub fn push_task_list(&mut self, list: TaskList) {
        self.task_lists.push(list);
        self.item_count += 1;
    }

    pub fn push_image(&mut self, image: Image) {
        self.images.push(image);
        self.item_count += 1;
    }

    /// Removes one item by identity, preserving the order of the rest.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let removed = if let Some(index) = self.notes.iter().position(|x| x.id == id) {
            Item::Note(self.notes.remove(index))
        } else if let Some(index) = self.task_lists.iter().position(|x| x.id == id) {
            Item::TaskList(self.task_lists.remove(index))
        } else if let Some(index) = self.images.iter().position(|x| x.id == id) {
            Item::Image(self.images.remove(index))
        } else {
            return None;
        };
        self.item_count -= 1;
        Some(removed)
    }

    /// Drops every item.
    pub fn clear(&mut self) {
        self.notes.clear();
        self.task_lists.clear();
        self.images.clear();
        self.item_count = 0;
    }

    pub fn kind_of(&self, id: ItemId) -> Option<ItemKind> {
        if self.notes.iter().any(|x| x.id == id) {
            Some(ItemKind::Note)
        } else if self.task_lists.iter().any(|x| x.id == id) {
            Some(ItemKind::TaskList)
        } else if self.images.iter().any(|x| x.id == id) {
            Some(ItemKind::Image)
        } else {
            None
        }
    }

    /// Returns an owned copy of one item.
    pub fn get(&self, id: ItemId) -> Option<Item> {
        if let Some(note) = self.note(id) {
            return Some(Item::Note(note.clone()));
        }
        if let Some(list) = self.task_list(id) {
            return Some(Item::TaskList(list.clone()));
        }
        self.image(id).map(|image| Item::Image(image.clone()))
    }

    pub fn note(&self, id: ItemId) -> Option<&Note> {
        self.notes.iter().find(|x| x.id == id)
    }

    pub fn note_mut(&mut self, id: ItemId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|x| x.id == id)
    }

    pub fn task_list(&self, id: ItemId) -> Option<&TaskList> {
        self.task_lists.iter().find(|x| x.id == id)
    }

    pub fn task_list_mut(&mut self, id: ItemId) -> Option<&mut TaskList> {
        self.task_lists.iter_mut().find(|x| x.id == id)
    }

    pub fn image(&self, id: ItemId) -> Option<&Image> {
        self.images.iter().find(|x| x.id == id)
    }

    pub fn placement(&self, id: ItemId) -> Option<&Placement> {
        if let Some(note) = self.note(id) {
            return Some(&note.placement);
        }
        if let Some(list) = self.task_list(id) {
            return Some(&list.placement);
        }
        self.image(id).map(|image| &image.placement)
    }

    pub fn placement_mut(&mut self, id: ItemId) -> Option<&mut Placement> {
        self.notes
            .iter_mut()
            .find(|x| x.id == id)
            .map(|x| &mut x.placement)
            .or_else(|| {
                self.task_lists
                    .iter_mut()
                    .find(|x| x.id == id)
                    .map(|x| &mut x.placement)
            })
            .or_else(|| {
                self.images
                    .iter_mut()
                    .find(|x| x.id == id)
                    .map(|x| &mut x.placement)
            })
    }

    pub fn style(&self, id: ItemId) -> Option<&ItemStyle> {
        if let Some(note) = self.note(id) {
            return Some(&note.style);
        }
        if let Some(list) = self.task_list(id) {
            return Some(&list.style);
        }
        self.image(id).map(|image| &image.style)
    }

    pub fn style_mut(&mut self, id: ItemId) -> Option<&mut ItemStyle> {
        self.notes
            .iter_mut()
            .find(|x| x.id == id)
            .map(|x| &mut x.style)
            .or_else(|| {
                self.task_lists
                    .iter_mut()
                    .find(|x| x.id == id)
                    .map(|x| &mut x.style)
            })
            .or_else(|| {
                self.images
                    .iter_mut()
                    .find(|x| x.id == id)
                    .map(|x| &mut x.style)
            })
    }

    /// Mirrors selection state onto the item. Returns `false` for unknown ids.
    pub fn set_selected(&mut self, id: ItemId, selected: bool) -> bool {
        if let Some(note) = self.notes.iter_mut().find(|x| x.id == id) {
            note.selected = selected;
            return true;
        }
        if let Some(list) = self.task_lists.iter_mut().find(|x| x.id == id) {
            list.selected = selected;
            return true;
        }
        if let Some(image) = self.images.iter_mut().find(|x| x.id == id) {
            image.selected = selected;
            return true;
        }
        false
    }

    /// All placements in scan order (notes, task lists, images).
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.notes
            .iter()
            .map(|x| &x.placement)
            .chain(self.task_lists.iter().map(|x| &x.placement))
            .chain(self.images.iter().map(|x| &x.placement))
    }

    /// Mutable placements in scan order (notes, task lists, images).
    pub fn placements_mut(&mut self) -> impl Iterator<Item = &mut Placement> {
        self.notes
            .iter_mut()
            .map(|x| &mut x.placement)
            .chain(self.task_lists.iter_mut().map(|x| &mut x.placement))
            .chain(self.images.iter_mut().map(|x| &mut x.placement))
    }
}
