use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

use crate::errors::CoreError;

/// A typed preference value, mirroring what a platform preference store
/// can hold for a single key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Double(f64),
    Text(String),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PrefValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Durable key-value storage for preferences.
///
/// The settings store only talks to this trait, so a platform can back it
/// with its own preference mechanism.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Human-readable backend name (for logs).
    fn name(&self) -> &str;

    /// Read every stored key. An empty map means nothing was written yet.
    async fn load_all(&self) -> Result<HashMap<String, PrefValue>, CoreError>;

    /// Write all entries as one unit: either every entry is stored or none is.
    async fn write_batch(&self, entries: Vec<(String, PrefValue)>) -> Result<(), CoreError>;
}

/// Volatile backend, used for tests and for `ExpenseTracker::in_memory`.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, PrefValue>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load_all(&self) -> Result<HashMap<String, PrefValue>, CoreError> {
        Ok(self.values.lock().await.clone())
    }

    async fn write_batch(&self, entries: Vec<(String, PrefValue)>) -> Result<(), CoreError> {
        let mut values = self.values.lock().await;
        values.extend(entries);
        Ok(())
    }
}

/// Backend storing all keys as one JSON object in a single file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous file intact.
#[derive(Debug)]
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<HashMap<String, PrefValue>, CoreError> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(HashMap::new());
        }
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(&data).map_err(|e| {
            CoreError::Deserialization(format!(
                "Failed to parse preferences file {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(prefs_from_json(raw))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn load_all(&self) -> Result<HashMap<String, PrefValue>, CoreError> {
        self.read_file().await
    }

    async fn write_batch(&self, entries: Vec<(String, PrefValue)>) -> Result<(), CoreError> {
        // Read-modify-write must not interleave with another writer.
        let _guard = self.write_lock.lock().await;

        let mut values = self.read_file().await?;
        values.extend(entries);

        let json = serde_json::to_string_pretty(&values)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize preferences: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, json.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Keep the entries that hold a `PrefValue`. Anything else (`null`, arrays,
/// objects) is dropped so the key reads as absent.
fn prefs_from_json(raw: HashMap<String, serde_json::Value>) -> HashMap<String, PrefValue> {
    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<PrefValue>(value.clone()) {
            Ok(pref) => Some((key, pref)),
            Err(_) => {
                warn!(%key, %value, "unreadable preference value, ignoring");
                None
            }
        })
        .collect()
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
