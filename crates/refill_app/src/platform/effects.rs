use std::time::Duration;

use refill_core::{Effect, ExtractionOutcome, Failure, Msg, SubmissionId};
use refill_engine::{encode, EngineEvent, EngineHandle, ExtractError};
use refill_logging::{refill_info, refill_warn};

use super::persistence::{failure_from_ledger, failure_from_store, Stores};

pub(crate) struct EffectRunner {
    engine: EngineHandle,
    stores: Stores,
}

impl EffectRunner {
    pub(crate) fn new(engine: EngineHandle, stores: Stores) -> Self {
        Self { engine, stores }
    }

    pub(crate) fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Executes effects in order and returns the messages they produce.
    pub(crate) fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        effects
            .into_iter()
            .filter_map(|effect| self.run_one(effect))
            .collect()
    }

    /// Drains completions that have already arrived.
    pub(crate) fn poll(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(settled_msg)
            .collect()
    }

    pub(crate) fn wait(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(settled_msg)
    }

    fn run_one(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::SaveCredential(credential) => self
                .stores
                .credential
                .save(&credential)
                .err()
                .map(|err| {
                    refill_warn!("Failed to save credential: {}", err);
                    Msg::PersistenceFailed(failure_from_store(&err))
                }),
            Effect::SaveInstructions(instructions) => self
                .stores
                .instructions
                .save(&instructions)
                .err()
                .map(|err| {
                    refill_warn!("Failed to save instructions: {}", err);
                    Msg::PersistenceFailed(failure_from_store(&err))
                }),
            Effect::Submit {
                submission_id,
                draft,
                credential,
            } => {
                let payload = match encode(&draft, &credential) {
                    Ok(payload) => payload,
                    Err(err) => {
                        return Some(settled(submission_id, Err(Failure::validation(err.to_string()))))
                    }
                };
                self.engine
                    .submit(submission_id, payload)
                    .err()
                    .map(|err| settled(submission_id, Err(failure_from_extract(err))))
            }
            Effect::AppendReport { record } => match self.stores.ledger.append(record) {
                Ok(report) => Some(Msg::ReportAppended(report)),
                Err(err) => {
                    refill_warn!("Report not persisted: {}", err);
                    Some(Msg::PersistenceFailed(failure_from_ledger(&err)))
                }
            },
            Effect::ClearReports => match self.stores.ledger.clear() {
                Ok(()) => Some(Msg::ReportsCleared),
                Err(err) => {
                    refill_warn!("Failed to clear reports: {}", err);
                    Some(Msg::PersistenceFailed(failure_from_ledger(&err)))
                }
            },
        }
    }
}

fn settled(submission_id: SubmissionId, outcome: ExtractionOutcome) -> Msg {
    Msg::SubmissionSettled {
        submission_id,
        outcome,
    }
}

fn settled_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SubmissionCompleted {
            submission_id,
            result,
        } => {
            match &result {
                Ok(record) => refill_info!(
                    "Submission #{} succeeded with {} keys",
                    submission_id,
                    record.len()
                ),
                Err(err) => refill_warn!("Submission #{} failed: {}", submission_id, err),
            }
            settled(submission_id, result.map_err(failure_from_extract))
        }
    }
}

fn failure_from_extract(err: ExtractError) -> Failure {
    if err.kind.is_decoding() {
        let message = match &err.free_text {
            Some(text) => format!("{}\n{}", err.message, text),
            None => err.message.clone(),
        };
        return Failure::decoding(message, err.raw.unwrap_or_default());
    }
    let failure = Failure::transport(err.to_string());
    match err.raw {
        Some(raw) => failure.with_raw(raw),
        None => failure,
    }
}
