use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use refill_logging::refill_debug;
use serde::{Deserialize, Serialize};

use crate::persist::{AtomicFileWriter, PersistError};

pub const STATE_FILENAME: &str = ".refill_state.ron";

/// Names of the durable string slots.
pub mod slots {
    pub const CREDENTIAL: &str = "openai_api_key";
    pub const INSTRUCTIONS: &str = "instructions";
    pub const REPORTS: &str = "reports";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read state from {path:?}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("state file {path:?} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("failed to serialize state: {0}")]
    Serialize(String),
    #[error("failed to write state: {0}")]
    Persist(#[from] PersistError),
    #[error("state store lock poisoned")]
    Poisoned,
}

/// Single-slot string storage. Absence of a slot is a valid state, never an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, slot: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, slot: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store, for tests and for shells without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, slot: &str) -> Result<Option<String>, StoreError> {
        let slots = self.slots.read().map_err(|_| StoreError::Poisoned)?;
        Ok(slots.get(slot).cloned())
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), StoreError> {
        let mut slots = self.slots.write().map_err(|_| StoreError::Poisoned)?;
        slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedSlots {
    slots: BTreeMap<String, String>,
}

/// All slots in one RON document, rewritten atomically on every `set`.
#[derive(Debug)]
pub struct FileStore {
    writer: AtomicFileWriter,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(state_dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(state_dir),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(STATE_FILENAME)
    }

    fn read_all(&self) -> Result<PersistedSlots, StoreError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PersistedSlots::default());
            }
            Err(err) => {
                return Err(StoreError::Read {
                    path,
                    message: err.to_string(),
                })
            }
        };
        ron::from_str(&content).map_err(|err| StoreError::Corrupt {
            path,
            message: err.to_string(),
        })
    }

    fn write_all(&self, state: &PersistedSlots) -> Result<(), StoreError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(state, pretty)
            .map_err(|err| StoreError::Serialize(err.to_string()))?;
        let path = self.writer.write(STATE_FILENAME, &content)?;
        refill_debug!("Wrote state to {:?}", path);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, slot: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.slots.remove(slot))
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        // A corrupt file is reported rather than clobbered.
        let mut state = self.read_all()?;
        state.slots.insert(slot.to_string(), value.to_string());
        self.write_all(&state)
    }
}
