use thiserror::Error;

/// Unified error type for the entire expense-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / File ──────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O ────────────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Expense validation failed: {0}")]
    ValidationError(String),

    #[error("Expense already exists: {0}")]
    DuplicateExpense(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
