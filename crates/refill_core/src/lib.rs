//! Refill core: pure form state machine and view-model helpers.
mod draft;
mod effect;
mod failure;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use draft::{split_keys, Draft, DraftFile};
pub use effect::Effect;
pub use failure::{ExtractionOutcome, Failure, FailureClass};
pub use msg::{Msg, RestoredSession};
pub use record::{reports_from_records, Record, Report};
pub use state::{AppState, LastOutcome, Phase, SubmissionId};
pub use update::update;
pub use view_model::AppViewModel;
