//! Refill engine: submission pipeline, response decoding and durable state.
mod client;
mod credential;
mod encode;
mod engine;
mod ledger;
mod normalize;
mod parse;
mod persist;
mod store;
mod types;

pub use client::{ClientSettings, ExtractionClient, ReqwestExtractionClient, REFILL_PATH};
pub use credential::{CredentialStore, InstructionsStore};
pub use encode::{encode, EncodeError, FilePart, SubmissionPayload};
pub use engine::EngineHandle;
pub use ledger::{LedgerError, ReportLedger};
pub use normalize::normalize_free_text;
pub use parse::{parse_response, render_record, DecodeError};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use store::{slots, FileStore, KeyValueStore, MemoryStore, StoreError, STATE_FILENAME};
pub use types::{EngineEvent, ExtractError, ExtractionResult, FailureKind};
