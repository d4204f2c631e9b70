use crate::view_model::AppViewModel;
use crate::{Draft, Failure, FailureClass, Record, Report};

pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting { submission_id: SubmissionId },
}

/// How the most recent submission ended; `Phase` is back to `Idle` by then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    draft: Draft,
    credential: String,
    phase: Phase,
    last_submission_id: SubmissionId,
    last_outcome: Option<LastOutcome>,
    latest: Option<Record>,
    error: Option<Failure>,
    reports: Vec<Report>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            file_names: self.draft.files().iter().map(|f| f.name.clone()).collect(),
            keys: self.draft.keys().to_string(),
            key_list: self.draft.key_list(),
            instructions: self.draft.instructions().to_string(),
            has_credential: !self.credential.is_empty(),
            can_submit: self.phase == Phase::Idle && self.draft.has_files(),
            last_outcome: self.last_outcome,
            latest: self.latest.clone(),
            error: self.error.clone(),
            reports: self.reports.clone(),
            dirty: self.dirty,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn latest(&self) -> Option<&Record> {
        self.latest.as_ref()
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn draft_mut(&mut self) -> &mut Draft {
        self.dirty = true;
        &mut self.draft
    }

    pub(crate) fn set_credential(&mut self, credential: String) {
        self.credential = credential;
        self.dirty = true;
    }

    pub(crate) fn begin_submission(&mut self) -> SubmissionId {
        self.last_submission_id += 1;
        let submission_id = self.last_submission_id;
        self.phase = Phase::Submitting { submission_id };
        self.error = None;
        self.dirty = true;
        submission_id
    }

    pub(crate) fn succeed(&mut self, record: Record) {
        self.phase = Phase::Idle;
        self.last_outcome = Some(LastOutcome::Succeeded);
        self.latest = Some(record);
        // `begin_submission` cleared older errors, so whatever persistence
        // failure is left was raised by this submission and must stay visible.
        self.error = self.take_persistence_error();
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, mut failure: Failure) {
        self.phase = Phase::Idle;
        self.last_outcome = Some(LastOutcome::Failed);
        self.latest = None;
        if let Some(pending) = self.take_persistence_error() {
            failure.message = format!("{}\n{}", failure.message, pending);
        }
        self.error = Some(failure);
        self.dirty = true;
    }

    fn take_persistence_error(&mut self) -> Option<Failure> {
        self.error
            .take()
            .filter(|failure| failure.class == FailureClass::Persistence)
    }

    /// Surfaces an error without touching the displayed result.
    pub(crate) fn report_error(&mut self, failure: Failure) {
        self.error = Some(failure);
        self.dirty = true;
    }

    pub(crate) fn push_report(&mut self, report: Report) {
        self.reports.push(report);
        self.dirty = true;
    }

    pub(crate) fn clear_reports(&mut self) {
        self.reports.clear();
        self.dirty = true;
    }

    pub(crate) fn restore_reports(&mut self, reports: Vec<Report>) {
        self.reports = reports;
        self.dirty = true;
    }
}
