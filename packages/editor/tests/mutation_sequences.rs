//! Tests for longer mutation sequences
//!
//! This tests:
//! - Debounce coalescing across mixed edits
//! - Undo/redo sequences and the redo-clearing rule
//! - History depth bound
//! - Undo/redo racing a pending edit
//! - Document integrity after duplication and reordering

use std::collections::HashSet;

use pagesmith_editor::{
    BlockPatch, BlockType, Columns, Document, Editor, EditorConfig, ManualClock, Mutation,
    SequentialIdGenerator,
};

const DEBOUNCE: u64 = 300;

fn editor_with(max_history: usize) -> (Editor, ManualClock) {
    let clock = ManualClock::new(0);
    let editor = Editor::with_parts(
        Document::with_id("doc-1", "Sequences", "general"),
        EditorConfig {
            max_history,
            debounce_ms: DEBOUNCE,
        },
        Box::new(clock.clone()),
        Box::new(SequentialIdGenerator::new()),
    );
    (editor, clock)
}

fn commit(editor: &mut Editor, clock: &ManualClock) {
    clock.advance(DEBOUNCE);
    assert!(editor.tick(), "expected a history entry");
}

#[test]
fn test_rapid_updates_commit_only_the_last() {
    let (mut editor, clock) = editor_with(50);
    let hero = editor.add_block(BlockType::Hero);
    commit(&mut editor, &clock);

    let mut last = None;
    for i in 1..=8 {
        editor
            .update_block(&hero, BlockPatch::new().title(format!("Title {i}")))
            .unwrap();
        last = Some(editor.document().clone());
        clock.advance(DEBOUNCE - 1);
        assert!(!editor.tick());
    }

    commit(&mut editor, &clock);
    assert_eq!(editor.history().past_len(), 2);
    assert_eq!(Some(editor.committed()), last.as_ref());
}

#[test]
fn test_mixed_edits_in_one_window_coalesce() {
    let (mut editor, clock) = editor_with(50);
    let text = editor.add_block(BlockType::Text);
    editor.add_block(BlockType::Image);
    editor
        .update_block(&text, BlockPatch::new().columns(Columns::Half))
        .unwrap();
    editor.reorder_block(0, 1).unwrap();
    commit(&mut editor, &clock);

    assert_eq!(editor.history().past_len(), 1);
    assert_eq!(editor.document().block_ids(), vec!["image-1", "text-1"]);

    editor.undo();
    assert!(editor.document().is_empty());
}

#[test]
fn test_undo_all_redo_all_then_branch() {
    let (mut editor, clock) = editor_with(50);
    for _ in 0..5 {
        editor.add_block(BlockType::Benefits);
        commit(&mut editor, &clock);
    }
    assert_eq!(editor.history().past_len(), 5);

    for _ in 0..5 {
        assert!(editor.undo());
    }
    assert!(!editor.undo());
    assert_eq!(editor.history().future_len(), 5);

    for _ in 0..5 {
        assert!(editor.redo());
    }
    assert!(!editor.redo());
    assert_eq!(editor.document().len(), 5);

    for _ in 0..3 {
        editor.undo();
    }
    assert_eq!(editor.history().future_len(), 3);

    editor.add_block(BlockType::Cta);
    commit(&mut editor, &clock);
    assert_eq!(editor.history().future_len(), 0);
}

#[test]
fn test_undo_then_redo_restores_any_committed_state() {
    let (mut editor, clock) = editor_with(50);
    let mut committed = vec![editor.committed().clone()];

    let hero = editor.add_block(BlockType::Hero);
    commit(&mut editor, &clock);
    committed.push(editor.committed().clone());

    editor.duplicate_block(&hero).unwrap();
    commit(&mut editor, &clock);
    committed.push(editor.committed().clone());

    editor.move_block_down(&hero).unwrap();
    commit(&mut editor, &clock);
    committed.push(editor.committed().clone());

    // Walk back to every committed state and check undo/redo pairs there
    for depth in 0..committed.len() - 1 {
        let before = editor.document().clone();
        assert!(editor.undo());
        assert!(editor.redo());
        assert_eq!(editor.document(), &before, "depth {depth}");
        editor.undo();
    }
    assert_eq!(editor.document(), &committed[0]);
}

#[test]
fn test_history_depth_is_bounded() {
    let (mut editor, clock) = editor_with(3);
    let text = editor.add_block(BlockType::Text);
    commit(&mut editor, &clock);

    for i in 0..10 {
        editor
            .update_block(&text, BlockPatch::new().title(format!("v{i}")))
            .unwrap();
        commit(&mut editor, &clock);
        assert!(editor.history().past_len() <= 3);
    }

    let mut undone = 0;
    while editor.undo() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(editor.document().block(&text).unwrap().title, "v6");
}

#[test]
fn test_undo_mid_debounce_discards_in_flight_edit() {
    let (mut editor, clock) = editor_with(50);
    let text = editor.add_block(BlockType::Text);
    commit(&mut editor, &clock);

    editor
        .update_block(&text, BlockPatch::new().title("In flight"))
        .unwrap();
    clock.advance(DEBOUNCE / 2);

    assert!(editor.undo());
    assert!(editor.document().is_empty());
    assert!(!editor.history().is_debouncing());

    // The timer that would have fired is gone
    clock.advance(DEBOUNCE * 4);
    assert!(!editor.tick());

    // Redo lands on the committed add, not the discarded title edit
    assert!(editor.redo());
    assert_eq!(editor.document().block(&text).unwrap().title, "Text");
}

#[test]
fn test_redo_mid_debounce_discards_in_flight_edit() {
    let (mut editor, clock) = editor_with(50);
    editor.add_block(BlockType::Video);
    commit(&mut editor, &clock);
    editor.undo();

    editor.add_block(BlockType::Faq);
    assert!(editor.redo());
    assert_eq!(editor.document().block_ids(), vec!["video-1"]);

    clock.advance(DEBOUNCE * 2);
    assert!(!editor.tick());
}

#[test]
fn test_duplicates_always_get_fresh_ids() {
    let (mut editor, clock) = editor_with(50);
    let first = editor.add_block(BlockType::Features);
    for _ in 0..4 {
        let before: HashSet<String> = editor
            .document()
            .block_ids()
            .into_iter()
            .map(String::from)
            .collect();
        let count = editor.document().len();

        let copy = editor.duplicate_block(&first).unwrap();

        assert_eq!(editor.document().len(), count + 1);
        assert!(!before.contains(&copy));
    }
    commit(&mut editor, &clock);

    let ids: HashSet<&str> = editor.document().block_ids().into_iter().collect();
    assert_eq!(ids.len(), editor.document().len());
}

#[test]
fn test_scripted_mutations_match_typed_calls() {
    let (mut scripted, _) = editor_with(50);
    let (mut typed, _) = editor_with(50);

    let script: Vec<Mutation> = serde_json::from_str(
        r#"[
            { "op": "addBlock", "blockType": "hero" },
            { "op": "addBlock", "blockType": "cta", "overrides": { "title": "Buy" } },
            { "op": "reorderBlock", "from": 1, "to": 0 },
            { "op": "toggleVisibility", "blockId": "hero-1" },
            { "op": "renameDocument", "name": "Launch" }
        ]"#,
    )
    .unwrap();
    for mutation in &script {
        scripted.apply(mutation).unwrap();
    }

    let hero = typed.add_block(BlockType::Hero);
    let cta = typed.add_block(BlockType::Cta);
    typed
        .update_block(&cta, BlockPatch::new().title("Buy"))
        .unwrap();
    typed.reorder_block(1, 0).unwrap();
    typed.toggle_visibility(&hero).unwrap();
    typed
        .apply(&Mutation::RenameDocument {
            name: "Launch".to_string(),
        })
        .unwrap();

    assert_eq!(scripted.document(), typed.document());
}
