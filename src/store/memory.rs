//! In-memory store used for ephemeral runs and tests

use std::{
    collections::{BTreeMap, HashSet},
    sync::Mutex,
};

use serde_json::Value;

use super::{DurableStore, Scope, SettingsStore, StoreError};

/// A `BTreeMap` behind a mutex, implementing both store ports
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Value>>,
    /// Keys whose writes are refused; fixed at build time
    rejected: HashSet<String>,
}

/// Builder for a pre-populated `MemoryStore`
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    values: BTreeMap<String, Value>,
    rejected: HashSet<String>,
}

impl MemoryStoreBuilder {
    pub fn value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Make every write to `key` fail with `StoreError::Rejected`
    #[cfg(any(test, feature = "testing-support"))]
    pub fn reject_writes_to(mut self, key: impl Into<String>) -> Self {
        self.rejected.insert(key.into());
        self
    }

    pub fn build(self) -> MemoryStore {
        MemoryStore {
            values: Mutex::new(self.values),
            rejected: self.rejected,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }

    /// Create a store pre-populated with `entries`
    pub fn with_values<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        entries
            .into_iter()
            .fold(Self::builder(), |builder, (k, v)| builder.value(k, v))
            .build()
    }

    /// Copy of every stored entry
    pub fn entries(&self) -> BTreeMap<String, Value> {
        self.values.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn check_writable(&self, key: &str) -> Result<(), StoreError> {
        if self.rejected.contains(key) {
            return Err(StoreError::Rejected {
                key: key.to_string(),
                reason: "read-only".to_string(),
            });
        }
        Ok(())
    }

    fn write(&self, key: &str, value: Option<Value>) -> Result<(), StoreError> {
        self.check_writable(key)?;
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        match value {
            Some(Value::Null) | None => {
                values.remove(key);
            }
            Some(value) => {
                values.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.read(key)
    }

    fn set(&self, key: &str, value: Value, _scope: Scope) -> Result<(), StoreError> {
        self.write(key, Some(value))
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.read(key)
    }

    fn set(&self, key: &str, value: Option<Value>) -> Result<(), StoreError> {
        self.write(key, value)
    }
}
