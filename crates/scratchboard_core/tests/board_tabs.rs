use scratchboard_core::{
    encode, BoardConfig, BoardEvent, BoardService, BoardServiceError, CodecError, Image, KvStore,
    MemoryKvStore, Note, Snapshot, TaskList,
};

fn open_board() -> BoardService<MemoryKvStore> {
    BoardService::open(MemoryKvStore::new(), BoardConfig::default()).unwrap()
}

fn encoded(board: &BoardService<MemoryKvStore>) -> String {
    encode(&board.export_snapshot(false)).unwrap()
}

#[test]
fn empty_store_opens_single_empty_tab() {
    let board = open_board();

    assert_eq!(board.tabs(), &[0]);
    assert_eq!(board.active_tab(), 0);
    assert_eq!(board.item_count(), 0);
}

#[test]
fn add_tab_is_monotonic_and_does_not_activate() {
    let mut board = open_board();
    let events = board.subscribe();

    assert_eq!(board.add_tab().unwrap(), 1);
    assert_eq!(board.add_tab().unwrap(), 2);

    assert_eq!(board.tabs(), &[0, 1, 2]);
    assert_eq!(board.active_tab(), 0);
    assert_eq!(events.try_recv().unwrap(), BoardEvent::TabAdded { tab: 1 });
    assert_eq!(
        board.store().get("clipboard_data_tabs").unwrap().as_deref(),
        Some("[0,1,2]")
    );
}

#[test]
fn switching_away_and_back_restores_content() {
    let mut board = open_board();
    let tab_b = board.add_tab().unwrap();
    board.add(Note::new("a-note", 1.0, 1.0).with_header("A")).unwrap();
    board.add(Image::new("a.png", 2.0, 2.0)).unwrap();
    let before = encoded(&board);

    board.activate(tab_b).unwrap();
    assert_eq!(board.item_count(), 0);
    board.add(TaskList::new(Some("b".to_string()), Vec::new(), 0.0, 0.0)).unwrap();

    board.activate(0).unwrap();
    assert_eq!(board.active_tab(), 0);
    assert_eq!(board.item_count(), 2);
    assert_eq!(encoded(&board), before);

    board.activate(tab_b).unwrap();
    assert_eq!(board.workspace().task_lists()[0].header.as_deref(), Some("b"));
}

#[test]
fn activating_unknown_tab_fails() {
    let mut board = open_board();

    let err = board.activate(7).unwrap_err();
    assert!(matches!(err, BoardServiceError::UnknownTab(7)));
    assert_eq!(board.active_tab(), 0);
}

#[test]
fn malformed_stored_tab_leaves_current_tab_active() {
    let store = MemoryKvStore::with_entries([
        ("clipboard_data_tabs", "[0,1]"),
        ("clipboard_data_1", "{broken"),
    ]);
    let mut board = BoardService::open(store, BoardConfig::default()).unwrap();
    board.add(Note::new("keep", 0.0, 0.0)).unwrap();

    let err = board.activate(1).unwrap_err();

    assert!(matches!(err, BoardServiceError::Codec(CodecError::Parse(_))));
    assert_eq!(board.active_tab(), 0);
    assert_eq!(board.item_count(), 1);
}

#[test]
fn open_discovers_seeded_tabs_without_tab_list() {
    let first = Snapshot {
        notes: Some(vec![Note::new("zero", 0.0, 0.0)]),
        task_lists: None,
        images: None,
    };
    let second = Snapshot {
        notes: None,
        task_lists: None,
        images: Some(vec![Image::new("one.png", 0.0, 0.0)]),
    };
    let store = MemoryKvStore::with_entries([
        ("clipboard_data_0", encode(&first).unwrap()),
        ("clipboard_data_1", encode(&second).unwrap()),
    ]);

    let mut board = BoardService::open(store, BoardConfig::default()).unwrap();

    assert_eq!(board.tabs(), &[0, 1]);
    assert_eq!(board.workspace().notes()[0].content, "zero");
    board.activate(1).unwrap();
    assert_eq!(board.workspace().images()[0].source, "one.png");
}

#[test]
fn every_mutation_writes_through_under_active_tab_key() {
    let config = BoardConfig::from_json_str(r#"{"namespace": "board"}"#).unwrap();
    let mut board = BoardService::open(MemoryKvStore::new(), config).unwrap();
    let tab = board.add_tab().unwrap();
    board.activate(tab).unwrap();

    let note = board.add(Note::new("n", 0.0, 0.0)).unwrap();
    let stored = board.store().get("board_1").unwrap().unwrap();
    assert!(stored.contains("\"n\""));

    board.set_position(note, 40.0, 50.0).unwrap();
    let stored = board.store().get("board_1").unwrap().unwrap();
    assert!(stored.contains("\"posX\":40"));

    board.flip_to_back(note).unwrap();
    board.delete(note).unwrap();
    let stored = board.store().get("board_1").unwrap().unwrap();
    assert_eq!(scratchboard_core::decode(&stored).unwrap().item_count(), 0);
}

#[test]
fn move_to_tab_transfers_item_to_top_of_target() {
    let mut board = open_board();
    let target = board.add_tab().unwrap();
    board.activate(target).unwrap();
    board.add(Note::new("resident", 0.0, 0.0)).unwrap();
    board.activate(0).unwrap();
    let keep = board.add(Note::new("stay", 0.0, 0.0)).unwrap();
    let moving = board.add(Note::new("travel", 3.0, 3.0)).unwrap();
    board.select(moving, true).unwrap();
    board.flip_to_back(moving).unwrap();

    board.move_to_tab(moving, target).unwrap();

    assert_eq!(board.item_count(), 1);
    assert_eq!(board.selected_count(), 0);
    assert_eq!(board.workspace().placement(keep).unwrap().pos_z, Some(1.0));

    board.activate(target).unwrap();
    let notes = board.workspace().notes();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[1].content, "travel");
    assert_eq!(notes[1].placement.pos_z, Some(2.0));
}

#[test]
fn move_to_active_tab_is_noop_and_unknown_tab_fails() {
    let mut board = open_board();
    let note = board.add(Note::new("n", 0.0, 0.0)).unwrap();

    board.move_to_tab(note, 0).unwrap();
    assert_eq!(board.item_count(), 1);

    let err = board.move_to_tab(note, 3).unwrap_err();
    assert!(matches!(err, BoardServiceError::UnknownTab(3)));
}

#[test]
fn add_note_from_clipboard_requires_some_text() {
    let mut board = open_board();
    let empty_clipboard = || -> Option<String> { None };
    let filled_clipboard = || Some("from clipboard".to_string());

    let err = board
        .add_note_from_clipboard(None, 0.0, 0.0, &empty_clipboard)
        .unwrap_err();
    assert!(matches!(err, BoardServiceError::EmptySource));
    let err = board
        .add_note_from_clipboard(Some("   ".to_string()), 0.0, 0.0, &|| Some(String::new()))
        .unwrap_err();
    assert!(matches!(err, BoardServiceError::EmptySource));
    assert_eq!(board.item_count(), 0);

    let id = board
        .add_note_from_clipboard(None, 1.0, 2.0, &filled_clipboard)
        .unwrap();
    assert_eq!(board.workspace().note(id).unwrap().content, "from clipboard");

    let id = board
        .add_note_from_clipboard(Some("typed".to_string()), 1.0, 2.0, &filled_clipboard)
        .unwrap();
    assert_eq!(board.workspace().note(id).unwrap().content, "typed");
}

#[test]
fn edits_keep_identity_and_persist() {
    let mut board = open_board();
    let source = board.add(Note::new("src", 0.0, 0.0)).unwrap();
    let target = board.add(Image::new("t.png", 0.0, 0.0)).unwrap();
    let list = board
        .add(TaskList::new(None, vec![scratchboard_core::Task::new("a")], 0.0, 0.0))
        .unwrap();

    board
        .edit_note(source, |note| {
            note.content = "<p>rich</p>".to_string();
            note.style.background_color = Some("#123456".to_string());
        })
        .unwrap();
    board.copy_style(target, source).unwrap();
    board.edit_task_list(list, |list| list.tasks[0].done = true).unwrap();
    board.toggle_code(source).unwrap();

    let workspace = board.workspace();
    assert_eq!(workspace.note(source).unwrap().content, "<p>rich</p>");
    assert_eq!(workspace.note(source).unwrap().code, Some(true));
    assert_eq!(
        workspace.style(target).unwrap().background_color.as_deref(),
        Some("#123456")
    );
    assert!(workspace.task_list(list).unwrap().tasks[0].done);

    let stored = board.store().get("clipboard_data_0").unwrap().unwrap();
    assert!(stored.contains("#123456"));
}

#[test]
fn added_markup_note_is_flagged_as_code() {
    let mut board = open_board();

    let html = board.add(Note::new("<b>bold</b>", 0.0, 0.0)).unwrap();
    let text = board.add(Note::new("plain", 0.0, 0.0)).unwrap();

    assert_eq!(board.workspace().note(html).unwrap().code, Some(true));
    assert_eq!(board.workspace().note(text).unwrap().code, None);
}

#[test]
fn identical_items_in_one_tab_collapse_when_the_tab_is_reloaded() {
    let mut board = open_board();
    let tab_b = board.add_tab().unwrap();
    board.add(Note::new("pasted", 4.0, 4.0)).unwrap();
    board.add(Note::new("pasted", 4.0, 4.0)).unwrap();
    assert_eq!(board.item_count(), 2);

    board.activate(tab_b).unwrap();
    board.activate(0).unwrap();

    assert_eq!(board.item_count(), 1);
    assert_eq!(board.workspace().notes()[0].placement.pos_z, Some(1.0));
}

#[test]
fn add_tab_fails_when_tab_ids_are_exhausted() {
    let store = MemoryKvStore::with_entries([("clipboard_data_tabs", "[0,4294967295]")]);
    let mut board = BoardService::open(store, BoardConfig::default()).unwrap();

    let err = board.add_tab().unwrap_err();

    assert!(matches!(err, BoardServiceError::TabIdsExhausted));
    assert_eq!(board.tabs(), &[0, u32::MAX]);
    assert_eq!(
        board.store().get("clipboard_data_tabs").unwrap().as_deref(),
        Some("[0,4294967295]")
    );
}

#[test]
fn board_writes_only_namespaced_keys() {
    let mut board = open_board();
    let tab = board.add_tab().unwrap();
    board.add(Note::new("n", 0.0, 0.0)).unwrap();
    board.activate(tab).unwrap();

    assert_eq!(
        board.store().keys(),
        vec!["clipboard_data_0", "clipboard_data_tabs"]
    );
}
