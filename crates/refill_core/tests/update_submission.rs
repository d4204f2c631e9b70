use std::sync::Once;

use pretty_assertions::assert_eq;
use refill_core::{
    update, AppState, Draft, DraftFile, Effect, Failure, FailureClass, LastOutcome, Msg, Phase,
    Record, Report,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(refill_logging::initialize_for_tests);
}

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn filled_form() -> AppState {
    let (state, _) = update(AppState::new(), Msg::CredentialChanged("sk-test".to_string()));
    let (state, _) = update(
        state,
        Msg::FilesSelected(vec![DraftFile::new("cv.txt", "Jane, jane@x.com")]),
    );
    let (state, _) = update(state, Msg::KeysChanged("name, email".to_string()));
    let (state, _) = update(
        state,
        Msg::InstructionsChanged("extract formally".to_string()),
    );
    state
}

fn submission_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Submit { submission_id, .. } => Some(*submission_id),
            _ => None,
        })
        .expect("submit effect")
}

#[test]
fn submit_without_files_is_a_validation_error() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::KeysChanged("name".to_string()));
    let (mut state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(
        state.error().map(|f| f.class),
        Some(FailureClass::Validation)
    );
    assert!(state.consume_dirty());
}

#[test]
fn submit_saves_credential_then_issues_request() {
    init_logging();
    let (state, effects) = update(filled_form(), Msg::SubmitClicked);

    let mut expected_draft = Draft::new();
    expected_draft.push_files([DraftFile::new("cv.txt", "Jane, jane@x.com")]);
    expected_draft.set_keys("name, email");
    expected_draft.set_instructions("extract formally");

    assert_eq!(
        effects,
        vec![
            Effect::SaveCredential("sk-test".to_string()),
            Effect::Submit {
                submission_id: 1,
                draft: expected_draft,
                credential: "sk-test".to_string(),
            },
        ]
    );
    assert_eq!(state.phase(), Phase::Submitting { submission_id: 1 });
    assert!(!state.view().can_submit);
}

#[test]
fn overlapping_submit_is_ignored_while_submitting() {
    init_logging();
    let (state, first) = update(filled_form(), Msg::SubmitClicked);
    let (state, second) = update(state, Msg::SubmitClicked);

    assert_eq!(submission_id(&first), 1);
    assert!(second.is_empty());
    assert_eq!(state.phase(), Phase::Submitting { submission_id: 1 });
}

#[test]
fn success_displays_record_and_appends_report() {
    init_logging();
    let (state, effects) = update(filled_form(), Msg::SubmitClicked);
    let submission_id = submission_id(&effects);
    let jane = record(&[("name", "Jane"), ("email", "jane@x.com")]);

    let (state, effects) = update(
        state,
        Msg::SubmissionSettled {
            submission_id,
            outcome: Ok(jane.clone()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::AppendReport {
            record: jane.clone()
        }]
    );
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.latest(), Some(&jane));
    assert!(state.reports().is_empty());

    let (state, effects) = update(
        state,
        Msg::ReportAppended(Report {
            position: 0,
            record: jane.clone(),
        }),
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.last_outcome, Some(LastOutcome::Succeeded));
    assert_eq!(view.reports.len(), 1);
    assert_eq!(view.reports[0].record, jane);
    assert!(view.can_submit);
}

#[test]
fn failure_surfaces_error_without_ledger_effect() {
    init_logging();
    let (state, effects) = update(filled_form(), Msg::SubmitClicked);
    let submission_id = submission_id(&effects);
    let failure = Failure::decoding("response is not valid JSON", "not json");

    let (state, effects) = update(
        state,
        Msg::SubmissionSettled {
            submission_id,
            outcome: Err(failure.clone()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.error(), Some(&failure));
    assert_eq!(state.latest(), None);
    assert_eq!(state.view().last_outcome, Some(LastOutcome::Failed));
}

#[test]
fn form_stays_usable_after_failure() {
    init_logging();
    let (state, effects) = update(filled_form(), Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::SubmissionSettled {
            submission_id: submission_id(&effects),
            outcome: Err(Failure::transport("connection refused")),
        },
    );
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(submission_id(&effects), 2);
    assert_eq!(state.error(), None);
}

#[test]
fn stale_completion_is_ignored() {
    init_logging();
    let (state, _) = update(filled_form(), Msg::SubmitClicked);
    let (state, effects) = update(
        state,
        Msg::SubmissionSettled {
            submission_id: 42,
            outcome: Ok(record(&[("name", "Stale")])),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Submitting { submission_id: 1 });
    assert_eq!(state.latest(), None);
}

#[test]
fn persistence_failure_keeps_latest_result_visible() {
    init_logging();
    let (state, effects) = update(filled_form(), Msg::SubmitClicked);
    let jane = record(&[("name", "Jane")]);
    let (state, _) = update(
        state,
        Msg::SubmissionSettled {
            submission_id: submission_id(&effects),
            outcome: Ok(jane.clone()),
        },
    );
    let (state, effects) = update(
        state,
        Msg::PersistenceFailed(Failure::persistence("disk full")),
    );

    assert!(effects.is_empty());
    assert_eq!(state.latest(), Some(&jane));
    assert_eq!(
        state.error().map(|f| f.class),
        Some(FailureClass::Persistence)
    );
    assert!(state.reports().is_empty());
}

#[test]
fn clear_reports_round_trips_through_ledger() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::ReportAppended(Report {
            position: 0,
            record: record(&[("a", "1")]),
        }),
    );
    let (state, effects) = update(state, Msg::ClearReportsClicked);
    assert_eq!(effects, vec![Effect::ClearReports]);
    assert_eq!(state.reports().len(), 1);

    let (state, _) = update(state, Msg::ReportsCleared);
    assert!(state.reports().is_empty());
}

#[test]
fn credential_write_failure_outlives_successful_submission() {
    init_logging();
    let (state, effects) = update(filled_form(), Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::PersistenceFailed(Failure::persistence("credential not saved")),
    );
    let jane = record(&[("name", "Jane")]);
    let (state, effects) = update(
        state,
        Msg::SubmissionSettled {
            submission_id: submission_id(&effects),
            outcome: Ok(jane.clone()),
        },
    );

    assert_eq!(effects, vec![Effect::AppendReport { record: jane.clone() }]);
    assert_eq!(state.latest(), Some(&jane));
    assert_eq!(
        state.error(),
        Some(&Failure::persistence("credential not saved"))
    );
}

#[test]
fn credential_write_failure_is_kept_beside_a_failed_submission() {
    init_logging();
    let (state, effects) = update(filled_form(), Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::PersistenceFailed(Failure::persistence("credential not saved")),
    );
    let (state, _) = update(
        state,
        Msg::SubmissionSettled {
            submission_id: submission_id(&effects),
            outcome: Err(Failure::transport("connection refused")),
        },
    );

    let error = state.error().expect("failure");
    assert_eq!(error.class, FailureClass::Transport);
    assert!(error.message.starts_with("connection refused"));
    assert!(error.message.contains("credential not saved"));
}
