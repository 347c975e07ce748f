//! Storage ports for editor settings and durable add-on state
//!
//! The settings store mirrors the host's configuration API (`get`/`set` with a
//! scope). The durable store is plain keyed persistence that outlives the
//! process and holds the preset snapshots.

pub mod fs;
pub mod memory;

use serde_json::Value;
use thiserror::Error;

pub use fs::JsonFileStore;
pub use memory::{MemoryStore, MemoryStoreBuilder};

/// Configuration target for a settings write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
}

/// Error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while reading/writing the backing file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Backing file holds something that is not a JSON object
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The store refused the write
    #[error("write to '{key}' rejected: {reason}")]
    Rejected { key: String, reason: String },
    /// A previous writer panicked while holding the store lock
    #[error("store lock poisoned")]
    Poisoned,
}

/// Mutable key/value editor settings
pub trait SettingsStore: Send + Sync {
    /// Current value of `key`, `None` when unset
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write `value` to `key`. Writing JSON `null` unsets the key.
    fn set(&self, key: &str, value: Value, scope: Scope) -> Result<(), StoreError>;

    /// Current value of `key`, falling back to `default` when unset
    fn get_or(&self, key: &str, default: Value) -> Result<Value, StoreError> {
        Ok(self.get(key)?.unwrap_or(default))
    }
}

/// Keyed persistence spanning process restarts
pub trait DurableStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Persist `value` under `key`; `None` removes the key
    fn set(&self, key: &str, value: Option<Value>) -> Result<(), StoreError>;
}
