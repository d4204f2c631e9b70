use crate::{Draft, Record, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SaveCredential(String),
    SaveInstructions(String),
    Submit {
        submission_id: SubmissionId,
        draft: Draft,
        credential: String,
    },
    AppendReport { record: Record },
    ClearReports,
}
