use crate::{DraftFile, ExtractionOutcome, Failure, Report, SubmissionId};

/// Persisted slots read back at startup. Absent slots stay `None`/empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RestoredSession {
    pub credential: Option<String>,
    pub instructions: Option<String>,
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the API credential field.
    CredentialChanged(String),
    /// User picked one or more files; appended to the current selection.
    FilesSelected(Vec<DraftFile>),
    /// User removed a file from the selection.
    FileRemoved { index: usize },
    /// User edited the comma-separated key list.
    KeysChanged(String),
    /// User edited the free-text instructions.
    InstructionsChanged(String),
    /// User submitted the form.
    SubmitClicked,
    /// Engine finished a submission (parse already applied).
    SubmissionSettled {
        submission_id: SubmissionId,
        outcome: ExtractionOutcome,
    },
    /// The ledger durably recorded a report.
    ReportAppended(Report),
    /// User asked to clear the report history.
    ClearReportsClicked,
    /// The ledger was cleared.
    ReportsCleared,
    /// A store or ledger write failed.
    PersistenceFailed(Failure),
    /// Restore persisted slots from a previous session.
    Restored(RestoredSession),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
