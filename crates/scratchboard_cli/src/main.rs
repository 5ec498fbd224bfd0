//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `scratchboard_core` linkage and open a board end to end.
//! - Keep output deterministic apart from the default export name.
//!
//! Usage: `scratchboard_cli [DB_PATH]`. Without a path the board lives in
//! memory. Set `SCRATCHBOARD_LOG_DIR` to an absolute path to enable file
//! logging.

use scratchboard_core::db::{open_db, open_db_in_memory};
use scratchboard_core::{BoardConfig, BoardService, SqliteKvStore};
use std::error::Error;

const LOG_DIR_ENV: &str = "SCRATCHBOARD_LOG_DIR";

fn main() -> Result<(), Box<dyn Error>> {
    println!("scratchboard_core ping={}", scratchboard_core::ping());
    println!("scratchboard_core version={}", scratchboard_core::core_version());

    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        scratchboard_core::init_logging(scratchboard_core::default_log_level(), &log_dir)?;
    }

    let conn = match std::env::args().nth(1) {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let store = SqliteKvStore::try_new(&conn)?;
    let board = BoardService::open(store, BoardConfig::default())?;

    println!("tabs={:?}", board.tabs());
    println!("active_tab={}", board.active_tab());
    println!("items={}", board.item_count());
    println!("export_name={}", board.export(None)?.file_name);
    Ok(())
}
