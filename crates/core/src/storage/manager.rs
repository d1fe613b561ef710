use std::path::Path;

use crate::errors::CoreError;
use crate::models::expense::Expense;

use super::format;
use super::kv::tmp_path;

/// High-level storage operations: save/load the expense list to/from bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Serialize expenses to raw bytes.
    ///
    /// Flow: Vec<Expense> → bincode → EXPT format bytes
    pub fn save_to_bytes(expenses: &[Expense]) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(expenses)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize expenses: {e}")))?;
        Ok(format::write_file(format::CURRENT_VERSION, &payload))
    }

    /// Deserialize expenses from raw bytes.
    pub fn load_from_bytes(data: &[u8]) -> Result<Vec<Expense>, CoreError> {
        let (_header, payload) = format::read_file(data)?;
        bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize expenses: {e}")))
    }

    /// Save expenses to a file, replacing it atomically via a temp file.
    pub fn save_to_file(expenses: &[Expense], path: &Path) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(expenses)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = tmp_path(path);
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Vec<Expense>, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }

    /// Like `load_from_file`, but a missing file is an empty list.
    pub fn load_or_empty(path: &Path) -> Result<Vec<Expense>, CoreError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Vec::new())
        }
    }
}
