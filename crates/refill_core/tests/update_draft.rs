use refill_core::{update, AppState, DraftFile, Effect, Msg, Record, Report, RestoredSession};

#[test]
fn file_selections_accumulate_and_can_be_removed() {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesSelected(vec![DraftFile::new("a.txt", "a")]),
    );
    let (state, _) = update(
        state,
        Msg::FilesSelected(vec![
            DraftFile::new("b.pdf", "b"),
            DraftFile::new("c.txt", "c"),
        ]),
    );
    assert_eq!(state.view().file_names, vec!["a.txt", "b.pdf", "c.txt"]);

    let (state, effects) = update(state, Msg::FileRemoved { index: 1 });
    assert!(effects.is_empty());
    assert_eq!(state.view().file_names, vec!["a.txt", "c.txt"]);
}

#[test]
fn removing_unknown_file_leaves_state_clean() {
    let (mut state, _) = update(
        AppState::new(),
        Msg::FilesSelected(vec![DraftFile::new("a.txt", "a")]),
    );
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::FileRemoved { index: 5 });
    assert!(!state.consume_dirty());
    assert_eq!(state.view().file_names, vec!["a.txt"]);
}

#[test]
fn keys_are_kept_verbatim_and_split_for_display() {
    let (state, effects) = update(AppState::new(), Msg::KeysChanged(" name , email,".to_string()));
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.keys, " name , email,");
    assert_eq!(view.key_list, vec!["name", "email"]);
}

#[test]
fn instructions_edit_is_persisted() {
    let (state, effects) = update(
        AppState::new(),
        Msg::InstructionsChanged("be terse".to_string()),
    );

    assert_eq!(effects, vec![Effect::SaveInstructions("be terse".to_string())]);
    assert_eq!(state.draft().instructions(), "be terse");
}

#[test]
fn restored_session_populates_form_and_history() {
    let record: Record = [("name".to_string(), "Jane".to_string())].into_iter().collect();
    let (state, effects) = update(
        AppState::new(),
        Msg::Restored(RestoredSession {
            credential: Some("sk-saved".to_string()),
            instructions: Some("extract formally".to_string()),
            reports: vec![Report {
                position: 0,
                record: record.clone(),
            }],
        }),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.has_credential);
    assert_eq!(state.credential(), "sk-saved");
    assert_eq!(view.instructions, "extract formally");
    assert_eq!(view.reports[0].record, record);
    assert!(view.dirty);
}

#[test]
fn empty_restore_keeps_defaults() {
    let (state, _) = update(AppState::new(), Msg::Restored(RestoredSession::default()));
    let view = state.view();

    assert!(!view.has_credential);
    assert!(view.instructions.is_empty());
    assert!(view.reports.is_empty());
}
