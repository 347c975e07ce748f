//! Filesystem-backed store keeping one JSON object per file

use std::{
    fs,
    path::PathBuf,
    sync::Mutex,
};

use directories::ProjectDirs;
use serde_json::{Map, Value};
use tracing::debug;

use super::{DurableStore, Scope, SettingsStore, StoreError};

/// A JSON object file loaded once and rewritten on every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Map::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(StoreError::Io(err)),
        };
        debug!("Opened {} with {} keys", path.display(), values.len());
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Resolve the platform data directory (e.g. `~/.local/share/accessibly`)
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "accessibly", "accessibly").map(|p| p.data_dir().to_path_buf())
    }

    fn write(&self, key: &str, value: Option<Value>) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        let mut next = values.clone();
        match value {
            Some(Value::Null) | None => {
                next.remove(key);
            }
            Some(value) => {
                next.insert(key.to_string(), value);
            }
        }
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    /// Write to a sibling temp file, then rename over the target
    fn persist(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.read(key)
    }

    fn set(&self, key: &str, value: Value, _scope: Scope) -> Result<(), StoreError> {
        self.write(key, Some(value))
    }
}

impl DurableStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.read(key)
    }

    fn set(&self, key: &str, value: Option<Value>) -> Result<(), StoreError> {
        self.write(key, value)
    }
}
