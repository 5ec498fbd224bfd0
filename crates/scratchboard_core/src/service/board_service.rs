//! Board tab coordinator.
//!
//! # Responsibility
//! - Own the active workspace, its selection, and the known tab list.
//! - Route UI-facing mutations through the board engines.
//! - Write the full active workspace through to the store after every
//!   mutation, and swap whole workspaces on tab switch.
//!
//! # Invariants
//! - The selection always refers to the active workspace; it is cleared
//!   whenever the workspace is replaced.
//! - Stored text is decoded before any in-memory state is replaced, so a
//!   malformed tab or import leaves the board unchanged.
//! - Tab ids are unique and handed out in increasing order.
//! - Log events carry ids and counts only, never item content.

use crate::board::merge::{merge, merge_text};
use crate::board::ordering::{self, next_order, renormalize};
use crate::board::selection::Selection;
use crate::board::UnregisteredItem;
use crate::config::{BoardConfig, ConfigError};
use crate::events::{BoardEvent, EventBus};
use crate::model::item::{new_item_id, Item, ItemId, Note, TaskList};
use crate::model::workspace::Workspace;
use crate::snapshot::{
    encode, export_file_name, export_snapshot, CodecError, ExportFile, Snapshot,
};
use crate::store::{KvStore, StoreError};
use chrono::{DateTime, Local, TimeZone};
use crossbeam::channel::Receiver;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of one board tab.
pub type TabId = u32;

pub type BoardResult<T> = Result<T, BoardServiceError>;

static MARKUP_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(\s[^<>]*)?/?>").expect("valid markup tag regex")
});

/// Errors from board use-cases.
#[derive(Debug)]
pub enum BoardServiceError {
    /// Snapshot or tab-list text could not be decoded/encoded.
    Codec(CodecError),
    /// Add-note had no content and the clipboard source was empty.
    EmptySource,
    /// Target item is not registered in the active workspace.
    UnregisteredItem(ItemId),
    /// Target tab is not in the tab list.
    UnknownTab(TabId),
    /// Key-value store failure.
    Store(StoreError),
    /// Board config failed validation.
    InvalidConfig(ConfigError),
    /// No tab id above the highest known one is representable.
    TabIdsExhausted,
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Codec(err) => write!(f, "{err}"),
            Self::EmptySource => write!(f, "nothing to add: no content and clipboard is empty"),
            Self::UnregisteredItem(id) => write!(f, "item is not on the active tab: {id}"),
            Self::UnknownTab(tab) => write!(f, "unknown tab: {tab}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidConfig(err) => write!(f, "{err}"),
            Self::TabIdsExhausted => write!(f, "no tab id left above {}", TabId::MAX),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CodecError> for BoardServiceError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

impl From<StoreError> for BoardServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<UnregisteredItem> for BoardServiceError {
    fn from(value: UnregisteredItem) -> Self {
        Self::UnregisteredItem(value.0)
    }
}

impl From<ConfigError> for BoardServiceError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

/// Source of note text when a note is added without content.
pub trait ClipboardSource {
    fn read_text(&self) -> Option<String>;
}

impl<F: Fn() -> Option<String>> ClipboardSource for F {
    fn read_text(&self) -> Option<String> {
        self()
    }
}

type ReorderFn = fn(&mut Workspace, ItemId) -> Result<(), UnregisteredItem>;

/// Multi-tab board facade over a key-value store.
pub struct BoardService<S: KvStore> {
    store: S,
    config: BoardConfig,
    tabs: Vec<TabId>,
    active_tab: TabId,
    workspace: Workspace,
    selection: Selection,
    events: EventBus,
}

impl<S: KvStore> BoardService<S> {
    /// Opens a board: loads the tab list and activates the first tab.
    ///
    /// Without a stored tab list, consecutive stored tabs starting at `0`
    /// are discovered; an empty store yields the single tab `0`.
    pub fn open(store: S, config: BoardConfig) -> BoardResult<Self> {
        config.validate()?;
        let tabs = load_tab_list(&store, &config)?;
        let first_tab = tabs.first().copied().unwrap_or(0);

        let mut service = Self {
            store,
            config,
            tabs,
            active_tab: first_tab,
            workspace: Workspace::new(),
            selection: Selection::new(),
            events: EventBus::new(),
        };
        service.workspace = service.load_tab(first_tab)?;

        info!(
            "event=board_open module=board status=ok tabs={} active_tab={} items={}",
            service.tabs.len(),
            first_tab,
            service.workspace.item_count()
        );
        Ok(service)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tabs(&self) -> &[TabId] {
        &self.tabs
    }

    pub fn active_tab(&self) -> TabId {
        self.active_tab
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn item_count(&self) -> usize {
        self.workspace.item_count()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.selected_count()
    }

    pub fn is_any_selected(&self) -> bool {
        self.selection.is_any_selected()
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&mut self) -> Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Appends a new tab id without activating it.
    ///
    /// # Errors
    /// - `TabIdsExhausted` when the highest known tab id is `TabId::MAX`.
    pub fn add_tab(&mut self) -> BoardResult<TabId> {
        let tab = match self.tabs.iter().max() {
            Some(highest) => highest
                .checked_add(1)
                .ok_or(BoardServiceError::TabIdsExhausted)?,
            None => 0,
        };
        self.tabs.push(tab);
        if let Err(err) = self.persist_tab_list() {
            self.tabs.pop();
            return Err(err);
        }

        info!("event=tab_add module=board status=ok tab={tab} tabs={}", self.tabs.len());
        self.events.publish(BoardEvent::TabAdded { tab });
        Ok(tab)
    }

    /// Flushes the active tab, then replaces all in-memory state with `tab`.
    pub fn activate(&mut self, tab: TabId) -> BoardResult<()> {
        self.ensure_known_tab(tab)?;
        self.persist()?;

        let workspace = match self.load_tab(tab) {
            Ok(workspace) => workspace,
            Err(err) => {
                warn!(
                    "event=tab_activate module=board status=error tab={tab} active_tab={} error={err}",
                    self.active_tab
                );
                return Err(err);
            }
        };

        let previous = self.active_tab;
        self.selection.clear();
        self.workspace = workspace;
        self.active_tab = tab;

        info!(
            "event=tab_activate module=board status=ok tab={tab} previous_tab={previous} items={}",
            self.workspace.item_count()
        );
        self.events.publish(BoardEvent::TabActivated {
            tab,
            item_count: self.workspace.item_count(),
        });
        Ok(())
    }

    /// Registers one item under a fresh identity and places it on top when
    /// it has no draw order yet.
    pub fn add(&mut self, item: impl Into<Item>) -> BoardResult<ItemId> {
        let mut item = item.into();
        let id = new_item_id();
        item.set_id(id);
        item.set_selected(false);
        if let Item::Note(note) = &mut item {
            detect_markup(note);
        }

        let kind = item.kind();
        self.mutate("add", |workspace, _| {
            if item.placement().pos_z.is_none() {
                item.placement_mut().pos_z = Some(next_order(workspace));
            }
            workspace.push(item);
            Ok(())
        })?;
        debug!(
            "event=item_add module=board status=ok kind={} tab={}",
            kind.as_str(),
            self.active_tab
        );
        Ok(id)
    }

    /// Adds a note from `content`, falling back to the clipboard source.
    ///
    /// # Errors
    /// - `EmptySource` when both are empty; nothing is created.
    pub fn add_note_from_clipboard(
        &mut self,
        content: Option<String>,
        pos_x: f64,
        pos_y: f64,
        clipboard: &dyn ClipboardSource,
    ) -> BoardResult<ItemId> {
        let text = content
            .filter(|value| !value.trim().is_empty())
            .or_else(|| clipboard.read_text().filter(|value| !value.trim().is_empty()));
        let Some(text) = text else {
            warn!(
                "event=item_add module=board status=rejected kind=note reason=empty_source tab={}",
                self.active_tab
            );
            return Err(BoardServiceError::EmptySource);
        };
        self.add(Note::new(text, pos_x, pos_y))
    }

    /// Removes one item, deselecting it first.
    pub fn delete(&mut self, id: ItemId) -> BoardResult<()> {
        let deselected = self.mutate("delete", |workspace, selection| {
            Ok(remove_item(workspace, selection, id)?)
        })?;
        if deselected {
            self.publish_selection();
        }
        Ok(())
    }

    /// Empties the active tab, resetting counts and selection.
    pub fn clear_all(&mut self) -> BoardResult<()> {
        let had_selection = self.mutate("clear_all", |workspace, selection| {
            let had_selection = selection.is_any_selected();
            workspace.clear();
            selection.clear();
            Ok(had_selection)
        })?;
        info!("event=board_clear module=board status=ok tab={}", self.active_tab);
        if had_selection {
            self.publish_selection();
        }
        Ok(())
    }

    pub fn bring_to_front(&mut self, id: ItemId) -> BoardResult<()> {
        self.reorder(id, ordering::bring_to_front, "bring_to_front")
    }

    pub fn bring_forward(&mut self, id: ItemId) -> BoardResult<()> {
        self.reorder(id, ordering::bring_forward, "bring_forward")
    }

    pub fn send_backward(&mut self, id: ItemId) -> BoardResult<()> {
        self.reorder(id, ordering::send_backward, "send_backward")
    }

    pub fn flip_to_back(&mut self, id: ItemId) -> BoardResult<()> {
        self.reorder(id, ordering::flip_to_back, "flip_to_back")
    }

    /// Selects or deselects one item. Returns whether the selection changed.
    ///
    /// Selection is UI-local and is not written to the store.
    pub fn select(&mut self, id: ItemId, on: bool) -> BoardResult<bool> {
        let changed = self.selection.apply(&mut self.workspace, id, on)?;
        if changed {
            debug!(
                "event=item_select module=board status=ok on={on} selected={}",
                self.selection.selected_count()
            );
            self.publish_selection();
        }
        Ok(changed)
    }

    /// Captures the active tab, optionally restricted to the selection.
    pub fn export_snapshot(&self, selection_only: bool) -> Snapshot {
        export_snapshot(&self.workspace, &self.selection, selection_only)
    }

    /// Encodes the selection (or the whole tab when nothing is selected)
    /// under a timestamped or caller-chosen file name.
    pub fn export(&self, name_override: Option<&str>) -> BoardResult<ExportFile> {
        self.export_at(name_override, &Local::now())
    }

    /// Same as `export`, with an explicit clock reading for the file name.
    pub fn export_at<Tz>(
        &self,
        name_override: Option<&str>,
        now: &DateTime<Tz>,
    ) -> BoardResult<ExportFile>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let snapshot = self.export_snapshot(true);
        let contents = encode(&snapshot)?;
        let file_name = export_file_name(
            name_override,
            now,
            &self.config.export_timestamp_format,
            &self.config.export_suffix,
        );
        info!(
            "event=board_export module=board status=ok tab={} items={} selection_only={}",
            self.active_tab,
            snapshot.item_count(),
            self.selection.is_any_selected()
        );
        Ok(ExportFile {
            file_name,
            contents,
        })
    }

    /// Merges snapshot text into the active tab. Returns the added count.
    ///
    /// Imported draw orders are renumbered together with the live ones.
    ///
    /// # Errors
    /// - `Codec(Parse)` when text is malformed; nothing is applied.
    pub fn import(&mut self, text: &str) -> BoardResult<usize> {
        let result = self.mutate("import", |workspace, _| {
            let added = merge_text(workspace, text)?;
            renormalize(workspace);
            Ok(added)
        });
        let added = match result {
            Ok(added) => added,
            Err(err) => {
                warn!(
                    "event=board_import module=board status=error tab={} error={err}",
                    self.active_tab
                );
                return Err(err);
            }
        };
        info!(
            "event=board_import module=board status=ok tab={} added={added} items={}",
            self.active_tab,
            self.workspace.item_count()
        );
        Ok(added)
    }

    /// Merges an in-process snapshot into the active tab.
    pub fn merge_snapshot(&mut self, snapshot: Snapshot) -> BoardResult<usize> {
        self.mutate("merge", |workspace, _| {
            let added = merge(workspace, snapshot);
            renormalize(workspace);
            Ok(added)
        })
    }

    /// Moves one item from the active tab to the top of another tab.
    ///
    /// Moving to the active tab is a no-op. The target tab is written first;
    /// if the source tab then fails to persist, the target is restored.
    pub fn move_to_tab(&mut self, id: ItemId, target: TabId) -> BoardResult<()> {
        self.ensure_known_tab(target)?;
        let mut item = self
            .workspace
            .get(id)
            .ok_or(BoardServiceError::UnregisteredItem(id))?;
        if target == self.active_tab {
            return Ok(());
        }

        let target_key = self.config.tab_key(target);
        let previous_target = self.store.get(&target_key)?;
        let mut target_workspace = self.load_tab(target)?;
        item.set_selected(false);
        item.placement_mut().pos_z = Some(next_order(&target_workspace));
        target_workspace.push(item);
        let text = encode(&Snapshot::of_workspace(&target_workspace))?;
        self.store.set(&target_key, &text)?;

        let deselected = match self.mutate("move_to_tab", |workspace, selection| {
            Ok(remove_item(workspace, selection, id)?)
        }) {
            Ok(deselected) => deselected,
            Err(err) => {
                self.restore_tab(target, previous_target);
                return Err(err);
            }
        };

        info!(
            "event=item_move module=board status=ok from_tab={} to_tab={target}",
            self.active_tab
        );
        self.events.publish(BoardEvent::ItemMoved {
            item: id,
            from: self.active_tab,
            to: target,
        });
        if deselected {
            self.publish_selection();
        }
        Ok(())
    }

    /// Updates canvas coordinates, e.g. at the end of a drag.
    pub fn set_position(&mut self, id: ItemId, pos_x: f64, pos_y: f64) -> BoardResult<()> {
        self.mutate("set_position", |workspace, _| {
            let placement = workspace
                .placement_mut(id)
                .ok_or(BoardServiceError::UnregisteredItem(id))?;
            placement.pos_x = pos_x;
            placement.pos_y = pos_y;
            Ok(())
        })
    }

    /// Applies an edit to one note. Identity and selection are kept.
    pub fn edit_note(&mut self, id: ItemId, edit: impl FnOnce(&mut Note)) -> BoardResult<()> {
        self.mutate("edit_note", |workspace, _| {
            let note = workspace
                .note_mut(id)
                .ok_or(BoardServiceError::UnregisteredItem(id))?;
            let selected = note.selected;
            edit(note);
            note.id = id;
            note.selected = selected;
            Ok(())
        })
    }

    /// Applies an edit to one task list. Identity and selection are kept.
    pub fn edit_task_list(
        &mut self,
        id: ItemId,
        edit: impl FnOnce(&mut TaskList),
    ) -> BoardResult<()> {
        self.mutate("edit_task_list", |workspace, _| {
            let list = workspace
                .task_list_mut(id)
                .ok_or(BoardServiceError::UnregisteredItem(id))?;
            let selected = list.selected;
            edit(list);
            list.id = id;
            list.selected = selected;
            Ok(())
        })
    }

    /// Flips a note between rendered text and markup source view.
    pub fn toggle_code(&mut self, id: ItemId) -> BoardResult<()> {
        self.mutate("toggle_code", |workspace, _| {
            let note = workspace
                .note_mut(id)
                .ok_or(BoardServiceError::UnregisteredItem(id))?;
            note.code = Some(!note.code.unwrap_or(false));
            Ok(())
        })
    }

    /// Copies colors from `source` onto `target`.
    pub fn copy_style(&mut self, target: ItemId, source: ItemId) -> BoardResult<()> {
        self.mutate("copy_style", |workspace, _| {
            let style = workspace
                .style(source)
                .cloned()
                .ok_or(BoardServiceError::UnregisteredItem(source))?;
            let target_style = workspace
                .style_mut(target)
                .ok_or(BoardServiceError::UnregisteredItem(target))?;
            *target_style = style;
            Ok(())
        })
    }

    fn reorder(&mut self, id: ItemId, op: ReorderFn, name: &'static str) -> BoardResult<()> {
        self.mutate(name, |workspace, _| Ok(op(workspace, id)?))
    }

    fn ensure_known_tab(&self, tab: TabId) -> BoardResult<()> {
        if self.tabs.contains(&tab) {
            Ok(())
        } else {
            Err(BoardServiceError::UnknownTab(tab))
        }
    }

    /// Decodes one stored tab into a fresh workspace with dense draw orders.
    fn load_tab(&self, tab: TabId) -> BoardResult<Workspace> {
        let mut workspace = Workspace::new();
        if let Some(text) = self.store.get(&self.config.tab_key(tab))? {
            merge_text(&mut workspace, &text)?;
            renormalize(&mut workspace);
        }
        Ok(workspace)
    }

    /// Writes the full active workspace under the active tab key.
    fn persist(&mut self) -> BoardResult<()> {
        let text = encode(&Snapshot::of_workspace(&self.workspace))?;
        self.store.set(&self.config.tab_key(self.active_tab), &text)?;
        Ok(())
    }

    fn persist_tab_list(&mut self) -> BoardResult<()> {
        let text = serde_json::to_string(&self.tabs).map_err(CodecError::Encode)?;
        self.store.set(&self.config.tabs_key(), &text)?;
        Ok(())
    }

    /// Puts a tab's stored text back after a failed cross-tab move.
    fn restore_tab(&mut self, tab: TabId, previous: Option<String>) {
        let text = match previous {
            Some(text) => text,
            None => match encode(&Snapshot::default()) {
                Ok(text) => text,
                Err(_) => return,
            },
        };
        if let Err(err) = self.store.set(&self.config.tab_key(tab), &text) {
            warn!("event=tab_restore module=board status=error tab={tab} error={err}");
        }
    }

    /// Runs one workspace change and writes it through.
    ///
    /// When `change` fails or the write-through fails, the workspace and
    /// selection are restored to their state before the call.
    fn mutate<T>(
        &mut self,
        operation: &'static str,
        change: impl FnOnce(&mut Workspace, &mut Selection) -> BoardResult<T>,
    ) -> BoardResult<T> {
        let saved_workspace = self.workspace.clone();
        let saved_selection = self.selection.clone();

        let outcome = change(&mut self.workspace, &mut self.selection).and_then(|value| {
            self.persist().map(|()| value).map_err(|err| {
                warn!(
                    "event=board_persist module=board status=error op={operation} tab={} error={err}",
                    self.active_tab
                );
                err
            })
        });
        let value = match outcome {
            Ok(value) => value,
            Err(err) => {
                self.workspace = saved_workspace;
                self.selection = saved_selection;
                return Err(err);
            }
        };

        debug!(
            "event=board_persist module=board status=ok op={operation} tab={} items={}",
            self.active_tab,
            self.workspace.item_count()
        );
        self.events.publish(BoardEvent::ItemsChanged {
            tab: self.active_tab,
            item_count: self.workspace.item_count(),
        });
        Ok(value)
    }

    fn publish_selection(&mut self) {
        self.events.publish(BoardEvent::SelectionChanged {
            tab: self.active_tab,
            selected_count: self.selection.selected_count(),
        });
    }
}

/// Deselects and removes one item, then renumbers the rest.
/// Returns whether the item was selected.
fn remove_item(
    workspace: &mut Workspace,
    selection: &mut Selection,
    id: ItemId,
) -> Result<bool, UnregisteredItem> {
    let kind = workspace.kind_of(id).ok_or(UnregisteredItem(id))?;
    let deselected = selection.select(kind, id, false);
    workspace.remove(id);
    renormalize(workspace);
    Ok(deselected)
}

fn load_tab_list<S: KvStore>(store: &S, config: &BoardConfig) -> BoardResult<Vec<TabId>> {
    let mut tabs: Vec<TabId> = match store.get(&config.tabs_key())? {
        Some(text) => serde_json::from_str(&text).map_err(CodecError::Parse)?,
        None => {
            let mut discovered = Vec::new();
            let mut tab: TabId = 0;
            while store.get(&config.tab_key(tab))?.is_some() {
                discovered.push(tab);
                tab += 1;
            }
            discovered
        }
    };
    tabs.sort_unstable();
    tabs.dedup();
    if tabs.is_empty() {
        tabs.push(0);
    }
    Ok(tabs)
}

/// Marks notes whose content contains markup tags as code, unless the
/// note explicitly opted out.
fn detect_markup(note: &mut Note) {
    if note.code != Some(false) && MARKUP_TAG_RE.is_match(&note.content) {
        note.code = Some(true);
    }
}
