//! Board item model.
//!
//! # Responsibility
//! - Define the three item kinds placed on a board: notes, task lists, images.
//! - Carry canvas placement and colors shared by every kind.
//!
//! # Invariants
//! - `id` is runtime slot identity only. It is never serialized, so every
//!   decode hands out fresh ids.
//! - `selected` is UI-local state and never serialized.
//! - Missing wire fields decode to defaults instead of failing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Runtime identity of one item slot on a board.
///
/// Two items with identical content still have different ids.
pub type ItemId = Uuid;

/// Generates a fresh item identity.
pub fn new_item_id() -> ItemId {
    Uuid::new_v4()
}

/// Item kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Note,
    TaskList,
    Image,
}

impl ItemKind {
    /// Stable lowercase name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::TaskList => "task_list",
            Self::Image => "image",
        }
    }
}

/// Canvas placement shared by every item kind.
///
/// Wire names (`posX`, `posY`, `posZ`) match data already stored by
/// earlier board versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(rename = "posX", default)]
    pub pos_x: f64,
    #[serde(rename = "posY", default)]
    pub pos_y: f64,
    /// Draw order, higher is in front. `None` means not yet placed in the stack.
    #[serde(rename = "posZ", default, skip_serializing_if = "Option::is_none")]
    pub pos_z: Option<f64>,
}

impl Placement {
    /// Unordered placement at canvas coordinates.
    pub fn at(pos_x: f64, pos_y: f64) -> Self {
        Self {
            pos_x,
            pos_y,
            pos_z: None,
        }
    }

    /// Returns whether both placements sit on the same canvas coordinates.
    pub fn same_position(&self, other: &Placement) -> bool {
        self.pos_x == other.pos_x && self.pos_y == other.pos_y
    }
}

/// Per-item colors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color_gradient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
}

/// Free-text note with optional header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(skip, default = "new_item_id")]
    pub id: ItemId,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Render content as markup source. `None` lets the board auto-detect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<bool>,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(flatten)]
    pub style: ItemStyle,
    #[serde(skip)]
    pub selected: bool,
}

impl Note {
    pub fn new(content: impl Into<String>, pos_x: f64, pos_y: f64) -> Self {
        Self {
            id: new_item_id(),
            content: content.into(),
            header: None,
            code: None,
            placement: Placement::at(pos_x, pos_y),
            style: ItemStyle::default(),
            selected: false,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// One entry of a task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }
}

/// Checklist item with optional header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(skip, default = "new_item_id")]
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(flatten)]
    pub style: ItemStyle,
    #[serde(skip)]
    pub selected: bool,
}

impl TaskList {
    pub fn new(header: Option<String>, tasks: Vec<Task>, pos_x: f64, pos_y: f64) -> Self {
        Self {
            id: new_item_id(),
            header,
            tasks,
            placement: Placement::at(pos_x, pos_y),
            style: ItemStyle::default(),
            selected: false,
        }
    }
}

/// Image pinned to the board by source (URL or data URI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(skip, default = "new_item_id")]
    pub id: ItemId,
    #[serde(default)]
    pub source: String,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(flatten)]
    pub style: ItemStyle,
    #[serde(skip)]
    pub selected: bool,
}

impl Image {
    pub fn new(source: impl Into<String>, pos_x: f64, pos_y: f64) -> Self {
        Self {
            id: new_item_id(),
            source: source.into(),
            placement: Placement::at(pos_x, pos_y),
            style: ItemStyle::default(),
            selected: false,
        }
    }
}

/// Any board item, used where callers handle all kinds uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Note(Note),
    TaskList(TaskList),
    Image(Image),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Note(_) => ItemKind::Note,
            Self::TaskList(_) => ItemKind::TaskList,
            Self::Image(_) => ItemKind::Image,
        }
    }

    pub fn set_id(&mut self, id: ItemId) {
        match self {
            Self::Note(note) => note.id = id,
            Self::TaskList(list) => list.id = id,
            Self::Image(image) => image.id = id,
        }
    }

    pub fn placement(&self) -> &Placement {
        match self {
            Self::Note(note) => &note.placement,
            Self::TaskList(list) => &list.placement,
            Self::Image(image) => &image.placement,
        }
    }

    pub fn placement_mut(&mut self) -> &mut Placement {
        match self {
            Self::Note(note) => &mut note.placement,
            Self::TaskList(list) => &mut list.placement,
            Self::Image(image) => &mut image.placement,
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        match self {
            Self::Note(note) => note.selected = selected,
            Self::TaskList(list) => list.selected = selected,
            Self::Image(image) => image.selected = selected,
        }
    }
}

impl From<Note> for Item {
    fn from(value: Note) -> Self {
        Self::Note(value)
    }
}

impl From<TaskList> for Item {
    fn from(value: TaskList) -> Self {
        Self::TaskList(value)
    }
}

impl From<Image> for Item {
    fn from(value: Image) -> Self {
        Self::Image(value)
    }
}
