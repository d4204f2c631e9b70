use std::sync::Arc;

use refill_core::{reports_from_records, Record, Report};
use refill_logging::refill_info;

use crate::store::{slots, KeyValueStore, StoreError};

const EMPTY_LEDGER: &str = "[]";

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("stored reports are not a JSON array of string mappings: {message}")]
    Corrupt { message: String, raw: String },
    #[error("report could not be serialized: {0}")]
    Serialize(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Decoding-class failures, as opposed to the store itself failing.
    pub fn is_decoding(&self) -> bool {
        matches!(self, LedgerError::Corrupt { .. } | LedgerError::Serialize(_))
    }
}

/// Append-only report history, persisted as one JSON array of records.
#[derive(Clone)]
pub struct ReportLedger {
    store: Arc<dyn KeyValueStore>,
}

impl ReportLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current history; empty when nothing was ever written.
    pub fn load(&self) -> Result<Vec<Report>, LedgerError> {
        Ok(reports_from_records(self.load_records()?))
    }

    /// Whether the ledger slot has ever been written (a cleared ledger exists).
    pub fn exists(&self) -> Result<bool, LedgerError> {
        Ok(self.store.get(slots::REPORTS)?.is_some())
    }

    /// Appends `record` and rewrites the whole sequence. On failure nothing is written.
    pub fn append(&self, record: Record) -> Result<Report, LedgerError> {
        let mut records = self.load_records()?;
        records.push(record.clone());
        let serialized =
            serde_json::to_string(&records).map_err(|err| LedgerError::Serialize(err.to_string()))?;
        self.store.set(slots::REPORTS, &serialized)?;

        let position = records.len() - 1;
        refill_info!("Appended report #{} to ledger", position);
        Ok(Report { position, record })
    }

    /// Replaces the history with the empty sequence.
    pub fn clear(&self) -> Result<(), LedgerError> {
        self.store.set(slots::REPORTS, EMPTY_LEDGER)?;
        refill_info!("Cleared report ledger");
        Ok(())
    }

    fn load_records(&self) -> Result<Vec<Record>, LedgerError> {
        let Some(raw) = self.store.get(slots::REPORTS)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => Err(LedgerError::Corrupt {
                message: err.to_string(),
                raw,
            }),
        }
    }
}
