use std::sync::Arc;

use refill_core::{Failure, FailureClass, Msg, RestoredSession};
use refill_engine::{
    CredentialStore, InstructionsStore, KeyValueStore, LedgerError, ReportLedger, StoreError,
};
use refill_logging::{refill_info, refill_warn};

/// The three durable slots, all backed by one key-value store.
#[derive(Clone)]
pub(crate) struct Stores {
    pub(crate) credential: CredentialStore,
    pub(crate) instructions: InstructionsStore,
    pub(crate) ledger: ReportLedger,
}

impl Stores {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            credential: CredentialStore::new(store.clone()),
            instructions: InstructionsStore::new(store.clone()),
            ledger: ReportLedger::new(store),
        }
    }
}

/// Reads every slot independently; a broken slot is reported and the rest still restore.
pub(crate) fn restore_session(stores: &Stores) -> Vec<Msg> {
    let mut failures = Vec::new();

    let credential = stores.credential.load().unwrap_or_else(|err| {
        refill_warn!("Failed to load saved credential: {}", err);
        failures.push(failure_from_store(&err));
        None
    });
    let instructions = stores.instructions.load().unwrap_or_else(|err| {
        refill_warn!("Failed to load saved instructions: {}", err);
        failures.push(failure_from_store(&err));
        None
    });
    let reports = stores.ledger.load().unwrap_or_else(|err| {
        refill_warn!("Failed to load report ledger: {}", err);
        failures.push(failure_from_ledger(&err));
        Vec::new()
    });

    refill_info!(
        "Restored session: credential={} instructions={} reports={}",
        credential.is_some(),
        instructions.is_some(),
        reports.len()
    );

    let mut msgs = vec![Msg::Restored(RestoredSession {
        credential,
        instructions,
        reports,
    })];
    msgs.extend(failures.into_iter().map(Msg::PersistenceFailed));
    msgs
}

pub(crate) fn failure_from_store(err: &StoreError) -> Failure {
    Failure::persistence(err.to_string())
}

pub(crate) fn failure_from_ledger(err: &LedgerError) -> Failure {
    match err {
        LedgerError::Corrupt { raw, .. } => Failure::decoding(err.to_string(), raw.clone()),
        LedgerError::Serialize(_) => Failure::new(FailureClass::Decoding, err.to_string()),
        LedgerError::Store(store_err) => failure_from_store(store_err),
    }
}
