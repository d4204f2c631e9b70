use crate::{AppState, Effect, Failure, Msg, Phase};

const NO_FILES_MESSAGE: &str = "select at least one file before submitting";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::CredentialChanged(credential) => {
            state.set_credential(credential);
            Vec::new()
        }
        Msg::FilesSelected(files) => {
            if !files.is_empty() {
                state.draft_mut().push_files(files);
            }
            Vec::new()
        }
        Msg::FileRemoved { index } => {
            if index < state.draft().files().len() {
                state.draft_mut().remove_file(index);
            }
            Vec::new()
        }
        Msg::KeysChanged(keys) => {
            state.draft_mut().set_keys(keys);
            Vec::new()
        }
        Msg::InstructionsChanged(instructions) => {
            state.draft_mut().set_instructions(instructions.clone());
            vec![Effect::SaveInstructions(instructions)]
        }
        Msg::SubmitClicked => {
            // One submission in flight at a time; overlapping clicks are dropped
            // so a double submit cannot append two reports.
            if state.is_submitting() {
                return (state, Vec::new());
            }
            if !state.draft().has_files() {
                state.report_error(Failure::validation(NO_FILES_MESSAGE));
                return (state, Vec::new());
            }
            let submission_id = state.begin_submission();
            let credential = state.credential().to_string();
            vec![
                Effect::SaveCredential(credential.clone()),
                Effect::Submit {
                    submission_id,
                    draft: state.draft().clone(),
                    credential,
                },
            ]
        }
        Msg::SubmissionSettled {
            submission_id,
            outcome,
        } => {
            if state.phase() != (Phase::Submitting { submission_id }) {
                return (state, Vec::new());
            }
            match outcome {
                Ok(record) => {
                    state.succeed(record.clone());
                    vec![Effect::AppendReport { record }]
                }
                Err(failure) => {
                    state.fail(failure);
                    Vec::new()
                }
            }
        }
        Msg::ReportAppended(report) => {
            state.push_report(report);
            Vec::new()
        }
        Msg::ClearReportsClicked => vec![Effect::ClearReports],
        Msg::ReportsCleared => {
            state.clear_reports();
            Vec::new()
        }
        Msg::PersistenceFailed(failure) => {
            state.report_error(failure);
            Vec::new()
        }
        Msg::Restored(restored) => {
            if let Some(credential) = restored.credential {
                state.set_credential(credential);
            }
            if let Some(instructions) = restored.instructions {
                state.draft_mut().set_instructions(instructions);
            }
            state.restore_reports(restored.reports);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
