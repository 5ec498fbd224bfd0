use rusqlite::ffi;
use scratchboard_core::{
    decode, BoardConfig, BoardEvent, BoardService, BoardServiceError, KvStore, MemoryKvStore,
    Note, StoreError, StoreResult,
};
use std::cell::Cell;
use std::rc::Rc;

const FIRST_TAB_KEY: &str = "clipboard_data_0";

/// Memory store that rejects writes to the first tab while `fail_writes` is set.
struct FlakyStore {
    inner: MemoryKvStore,
    fail_writes: Rc<Cell<bool>>,
}

impl KvStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.get() && key == FIRST_TAB_KEY {
            return Err(StoreError::Sqlite(rusqlite::Error::SqliteFailure(
                ffi::Error::new(ffi::SQLITE_FULL),
                None,
            )));
        }
        self.inner.set(key, value)
    }
}

fn open_flaky_board() -> (BoardService<FlakyStore>, Rc<Cell<bool>>) {
    let fail_writes = Rc::new(Cell::new(false));
    let store = FlakyStore {
        inner: MemoryKvStore::new(),
        fail_writes: Rc::clone(&fail_writes),
    };
    let board = BoardService::open(store, BoardConfig::default()).expect("board should open");
    (board, fail_writes)
}

fn orders(board: &BoardService<FlakyStore>) -> Vec<Option<f64>> {
    board
        .workspace()
        .placements()
        .map(|placement| placement.pos_z)
        .collect()
}

#[test]
fn failed_add_leaves_no_item_behind() {
    let (mut board, fail_writes) = open_flaky_board();
    let events = board.subscribe();
    fail_writes.set(true);

    let err = board
        .add(Note::new("a", 0.0, 0.0))
        .expect_err("add should fail while writes fail");

    assert!(matches!(err, BoardServiceError::Store(StoreError::Sqlite(_))));
    assert_eq!(board.item_count(), 0);
    assert!(board.workspace().notes().is_empty());
    assert!(events.try_recv().is_err());
}

#[test]
fn failed_delete_keeps_item_and_selection() {
    let (mut board, fail_writes) = open_flaky_board();
    let note = board.add(Note::new("a", 0.0, 0.0)).expect("add");
    board.select(note, true).expect("note should be selectable");
    fail_writes.set(true);

    board
        .delete(note)
        .expect_err("delete should fail while writes fail");

    assert_eq!(board.item_count(), 1);
    assert_eq!(board.selected_count(), 1);
    assert!(board.workspace().note(note).expect("note should remain").selected);
}

#[test]
fn failed_reorder_and_edits_restore_previous_state() {
    let (mut board, fail_writes) = open_flaky_board();
    let first = board.add(Note::new("first", 0.0, 0.0)).expect("add");
    let second = board.add(Note::new("second", 0.0, 0.0)).expect("add");
    let before = orders(&board);
    fail_writes.set(true);

    board
        .flip_to_back(second)
        .expect_err("reorder should fail while writes fail");
    board
        .set_position(first, 50.0, 50.0)
        .expect_err("move should fail while writes fail");
    board
        .edit_note(first, |note| note.content = "changed".to_string())
        .expect_err("edit should fail while writes fail");
    board
        .toggle_code(first)
        .expect_err("toggle should fail while writes fail");

    assert_eq!(orders(&board), before);
    let note = board.workspace().note(first).expect("note should remain");
    assert_eq!(note.content, "first");
    assert_eq!(note.placement.pos_x, 0.0);
    assert_eq!(note.code, None);
}

#[test]
fn failed_import_and_clear_keep_workspace() {
    let (mut board, fail_writes) = open_flaky_board();
    let note = board.add(Note::new("a", 0.0, 0.0)).expect("add");
    board.select(note, true).expect("note should be selectable");
    fail_writes.set(true);

    board
        .import(r#"{"notes": [{"content": "b", "posX": 1, "posY": 1}]}"#)
        .expect_err("import should fail while writes fail");
    board
        .clear_all()
        .expect_err("clear should fail while writes fail");

    assert_eq!(board.item_count(), 1);
    assert_eq!(board.selected_count(), 1);
}

#[test]
fn failed_source_write_restores_target_tab() {
    let (mut board, fail_writes) = open_flaky_board();
    let target = board.add_tab().expect("tab registration");
    let note = board.add(Note::new("travel", 0.0, 0.0)).expect("add");
    let events = board.subscribe();
    fail_writes.set(true);

    board
        .move_to_tab(note, target)
        .expect_err("move should fail while source writes fail");

    assert_eq!(board.item_count(), 1);
    assert!(board.workspace().note(note).is_some());
    assert!(events
        .try_iter()
        .all(|event| !matches!(event, BoardEvent::ItemMoved { .. })));
    let stored = board
        .store()
        .get("clipboard_data_1")
        .expect("store read")
        .expect("target tab should stay stored");
    assert_eq!(decode(&stored).expect("target tab should decode").item_count(), 0);

    fail_writes.set(false);
    board.activate(target).expect("target tab should activate");
    assert_eq!(board.item_count(), 0);
}
