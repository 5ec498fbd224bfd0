//! Snapshot transport codec.
//!
//! # Responsibility
//! - Capture a workspace (or only its selection) as a `Snapshot`.
//! - Encode/decode snapshots as JSON text for storage, export, and import.
//!
//! # Invariants
//! - Absent or `null` top-level fields decode as "not present"; accessors
//!   always expose them as empty slices.
//! - Snapshots carry no identity: every decode yields fresh item ids.
//! - Decoding never partially succeeds.

use crate::board::selection::Selection;
use crate::model::item::{Image, Note, TaskList};
use crate::model::workspace::Workspace;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod export;

pub use export::{export_file_name, ExportFile};

/// Codec failures.
#[derive(Debug)]
pub enum CodecError {
    /// Text is not a well-formed snapshot document.
    Parse(serde_json::Error),
    /// Snapshot could not be rendered as text.
    Encode(serde_json::Error),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "malformed snapshot: {err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

/// Point-in-time copy of a workspace's item collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
    #[serde(rename = "taskLists", default, skip_serializing_if = "Option::is_none")]
    pub task_lists: Option<Vec<TaskList>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Image>>,
}

impl Snapshot {
    /// Copies every item of `workspace` in current order.
    pub fn of_workspace(workspace: &Workspace) -> Self {
        Self {
            notes: Some(workspace.notes().to_vec()),
            task_lists: Some(workspace.task_lists().to_vec()),
            images: Some(workspace.images().to_vec()),
        }
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.as_deref().unwrap_or(&[])
    }

    pub fn task_lists(&self) -> &[TaskList] {
        self.task_lists.as_deref().unwrap_or(&[])
    }

    pub fn images(&self) -> &[Image] {
        self.images.as_deref().unwrap_or(&[])
    }

    /// Total items across all present fields.
    pub fn item_count(&self) -> usize {
        self.notes().len() + self.task_lists().len() + self.images().len()
    }
}

/// Captures the workspace for export.
///
/// With `selection_only` and a non-empty selection, returns the selected
/// items in selection order; otherwise returns every item.
pub fn export_snapshot(
    workspace: &Workspace,
    selection: &Selection,
    selection_only: bool,
) -> Snapshot {
    if !(selection_only && selection.is_any_selected()) {
        return Snapshot::of_workspace(workspace);
    }

    Snapshot {
        notes: Some(
            selection
                .notes()
                .iter()
                .filter_map(|id| workspace.note(*id))
                .cloned()
                .collect(),
        ),
        task_lists: Some(
            selection
                .task_lists()
                .iter()
                .filter_map(|id| workspace.task_list(*id))
                .cloned()
                .collect(),
        ),
        images: Some(
            selection
                .images()
                .iter()
                .filter_map(|id| workspace.image(*id))
                .cloned()
                .collect(),
        ),
    }
}

/// Renders a snapshot as JSON text.
pub fn encode(snapshot: &Snapshot) -> Result<String, CodecError> {
    serde_json::to_string(snapshot).map_err(CodecError::Encode)
}

/// Parses JSON text into a snapshot.
///
/// # Errors
/// - Returns `CodecError::Parse` when text is not a JSON object of the
///   snapshot shape.
pub fn decode(text: &str) -> Result<Snapshot, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Parse)
}
