//! Core state and ordering engine for ScratchBoard.
//! This crate is the single source of truth for board invariants.

pub mod board;
pub mod config;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod service;
pub mod snapshot;
pub mod store;

pub use board::selection::Selection;
pub use board::UnregisteredItem;
pub use config::{BoardConfig, ConfigError};
pub use events::{BoardEvent, EventBus};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{
    new_item_id, Image, Item, ItemId, ItemKind, ItemStyle, Note, Placement, Task, TaskList,
};
pub use model::workspace::Workspace;
pub use service::board_service::{
    BoardResult, BoardService, BoardServiceError, ClipboardSource, TabId,
};
pub use snapshot::{decode, encode, export_file_name, CodecError, ExportFile, Snapshot};
pub use store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
