use std::sync::Arc;

use refill_logging::refill_debug;

use crate::store::{slots, KeyValueStore, StoreError};

/// A single string-valued slot; empty values read back as absent.
#[derive(Clone)]
struct StringSlot {
    store: Arc<dyn KeyValueStore>,
    slot: &'static str,
}

impl StringSlot {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.store.get(self.slot)?.filter(|value| !value.is_empty()))
    }

    fn save(&self, value: &str) -> Result<(), StoreError> {
        self.store.set(self.slot, value)?;
        refill_debug!("Saved slot {} ({} bytes)", self.slot, value.len());
        Ok(())
    }
}

/// Persists the API credential. The value is opaque; format checks belong to the service.
#[derive(Clone)]
pub struct CredentialStore {
    slot: StringSlot,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            slot: StringSlot {
                store,
                slot: slots::CREDENTIAL,
            },
        }
    }

    pub fn load(&self) -> Result<Option<String>, StoreError> {
        self.slot.load()
    }

    /// Overwrites unconditionally.
    pub fn save(&self, credential: &str) -> Result<(), StoreError> {
        self.slot.save(credential)
    }
}

/// Persists the instructions draft between sessions.
#[derive(Clone)]
pub struct InstructionsStore {
    slot: StringSlot,
}

impl InstructionsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            slot: StringSlot {
                store,
                slot: slots::INSTRUCTIONS,
            },
        }
    }

    pub fn load(&self) -> Result<Option<String>, StoreError> {
        self.slot.load()
    }

    pub fn save(&self, instructions: &str) -> Result<(), StoreError> {
        self.slot.save(instructions)
    }
}
