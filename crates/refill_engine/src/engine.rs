use std::sync::{mpsc, Arc};
use std::thread;

use refill_core::SubmissionId;
use refill_logging::{refill_error, refill_info};

use crate::client::{ClientSettings, ExtractionClient, ReqwestExtractionClient};
use crate::{EngineEvent, ExtractError, FailureKind, SubmissionPayload};

enum EngineCommand {
    Submit {
        submission_id: SubmissionId,
        payload: SubmissionPayload,
    },
}

/// Runs submissions on a background async runtime and reports completions
/// over a channel. Submissions are independent; nothing is serialized here.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Self {
        Self::with_client(Arc::new(ReqwestExtractionClient::new(settings)))
    }

    pub fn with_client(client: Arc<dyn ExtractionClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    refill_error!("Failed to start async runtime: {}", err);
                    fail_pending(&cmd_rx, &event_tx, &err.to_string());
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, event_tx).await;
                });
            }
            // Let in-flight submissions settle before the runtime is dropped.
            runtime.shutdown_timeout(std::time::Duration::from_secs(5));
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(
        &self,
        submission_id: SubmissionId,
        payload: SubmissionPayload,
    ) -> Result<(), ExtractError> {
        refill_info!("Submitting #{} ({} files)", submission_id, payload.files().len());
        self.cmd_tx
            .send(EngineCommand::Submit {
                submission_id,
                payload,
            })
            .map_err(|_| ExtractError::new(FailureKind::Network, "extraction engine stopped"))
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next completion arrives or `timeout` elapses.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    client: &dyn ExtractionClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit {
            submission_id,
            payload,
        } => {
            let result = client.submit(payload).await;
            let _ = event_tx.send(EngineEvent::SubmissionCompleted {
                submission_id,
                result,
            });
        }
    }
}

fn fail_pending(
    cmd_rx: &mpsc::Receiver<EngineCommand>,
    event_tx: &mpsc::Sender<EngineEvent>,
    reason: &str,
) {
    while let Ok(EngineCommand::Submit { submission_id, .. }) = cmd_rx.recv() {
        let _ = event_tx.send(EngineEvent::SubmissionCompleted {
            submission_id,
            result: Err(ExtractError::new(
                FailureKind::Network,
                format!("async runtime unavailable: {reason}"),
            )),
        });
    }
}
