use crate::{Failure, LastOutcome, Phase, Record, Report};

/// Everything a presentational shell needs to render the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub file_names: Vec<String>,
    pub keys: String,
    pub key_list: Vec<String>,
    pub instructions: String,
    pub has_credential: bool,
    pub can_submit: bool,
    pub last_outcome: Option<LastOutcome>,
    pub latest: Option<Record>,
    pub error: Option<Failure>,
    pub reports: Vec<Report>,
    pub dirty: bool,
}
