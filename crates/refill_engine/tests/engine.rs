use std::sync::Arc;
use std::time::Duration;

use refill_core::{Draft, DraftFile, Record};
use refill_engine::{
    encode, EngineEvent, EngineHandle, ExtractionClient, ExtractionResult, SubmissionPayload,
};

/// Echoes the first file name back as a record; `slow*` files take longer.
struct EchoClient;

#[async_trait::async_trait]
impl ExtractionClient for EchoClient {
    async fn submit(&self, payload: SubmissionPayload) -> ExtractionResult {
        let name = payload.files()[0].filename.clone();
        let delay = if name.starts_with("slow") { 200 } else { 10 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        let mut record = Record::new();
        record.insert("file".to_string(), name);
        Ok(record)
    }
}

fn payload(name: &str) -> SubmissionPayload {
    let mut draft = Draft::new();
    draft.push_files([DraftFile::new(name, "x")]);
    encode(&draft, "sk").unwrap()
}

fn completed_id(event: EngineEvent) -> (u64, String) {
    match event {
        EngineEvent::SubmissionCompleted {
            submission_id,
            result,
        } => (submission_id, result.unwrap()["file"].clone()),
    }
}

#[test]
fn completions_are_delivered_with_their_submission_id() {
    let engine = EngineHandle::with_client(Arc::new(EchoClient));
    engine.submit(7, payload("a.txt")).unwrap();

    let event = engine.recv_timeout(Duration::from_secs(5)).expect("completion");
    assert_eq!(completed_id(event), (7, "a.txt".to_string()));
    assert!(engine.try_recv().is_none());
}

#[test]
fn overlapping_submissions_complete_in_finish_order() {
    let engine = EngineHandle::with_client(Arc::new(EchoClient));
    engine.submit(1, payload("slow.txt")).unwrap();
    engine.submit(2, payload("fast.txt")).unwrap();

    let first = engine.recv_timeout(Duration::from_secs(5)).expect("first");
    let second = engine.recv_timeout(Duration::from_secs(5)).expect("second");
    assert_eq!(completed_id(first), (2, "fast.txt".to_string()));
    assert_eq!(completed_id(second), (1, "slow.txt".to_string()));
}
