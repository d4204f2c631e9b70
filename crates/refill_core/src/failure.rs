use std::fmt;

use crate::Record;

/// Outcome of one submission as seen by the form.
pub type ExtractionOutcome = Result<Record, Failure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Rejected before any network call.
    Validation,
    Transport,
    /// Response (or stored history) did not decode into string mappings.
    Decoding,
    Persistence,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureClass::Validation => write!(f, "validation error"),
            FailureClass::Transport => write!(f, "transport error"),
            FailureClass::Decoding => write!(f, "decoding error"),
            FailureClass::Persistence => write!(f, "persistence error"),
        }
    }
}

/// User-facing failure text, with the offending raw payload when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub class: FailureClass,
    pub message: String,
    pub raw: Option<String>,
}

impl Failure {
    pub fn new(class: FailureClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
            raw: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureClass::Validation, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureClass::Transport, message)
    }

    pub fn decoding(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(FailureClass::Decoding, message).with_raw(raw)
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(FailureClass::Persistence, message)
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class, self.message)?;
        if let Some(raw) = &self.raw {
            write!(f, "\n{raw}")?;
        }
        Ok(())
    }
}
