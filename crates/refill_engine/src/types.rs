use std::fmt;

use refill_core::{Record, SubmissionId};

use crate::parse::DecodeError;

/// Outcome of one round trip with the extraction service.
pub type ExtractionResult = Result<Record, ExtractError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SubmissionCompleted {
        submission_id: SubmissionId,
        result: ExtractionResult,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ExtractError {
    pub kind: FailureKind,
    pub message: String,
    /// Offending response text, when the service answered at all.
    pub raw: Option<String>,
    /// Normalized rendering of a free-text answer that was not a mapping.
    pub free_text: Option<String>,
}

impl ExtractError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raw: None,
            free_text: None,
        }
    }

    pub(crate) fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }
}

impl From<DecodeError> for ExtractError {
    fn from(err: DecodeError) -> Self {
        Self {
            kind: FailureKind::Decoding,
            message: err.message,
            raw: Some(err.raw),
            free_text: err.free_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Encoding,
    Network,
    Timeout,
    HttpStatus(u16),
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decoding,
}

impl FailureKind {
    pub fn is_decoding(&self) -> bool {
        matches!(self, FailureKind::Decoding)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid service url"),
            FailureKind::Encoding => write!(f, "could not encode submission"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decoding => write!(f, "undecodable response"),
        }
    }
}
