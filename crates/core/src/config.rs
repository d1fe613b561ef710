use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::CoreError;

pub const DATA_DIR_ENV: &str = "EXPENSE_TRACKER_DATA_DIR";
pub const PERSIST_EXPENSES_ENV: &str = "EXPENSE_TRACKER_PERSIST_EXPENSES";
pub const LOG_FILTER_ENV: &str = "EXPENSE_TRACKER_LOG";

const APP_DIR_NAME: &str = "expense-tracker";
const FALLBACK_DATA_DIR: &str = ".expense-tracker";

/// Where and how the tracker keeps its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Directory holding the settings and expense files
    pub data_dir: PathBuf,

    /// Preferences file name inside `data_dir`
    pub settings_file: String,

    /// Expense data file name inside `data_dir`
    pub expenses_file: String,

    /// Keep expenses across restarts. When false they live only in memory.
    pub persist_expenses: bool,

    /// Default `tracing` filter directive, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR));
        Self::with_data_dir(data_dir)
    }
}

impl TrackerConfig {
    /// Default configuration rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            settings_file: "settings.json".into(),
            expenses_file: "expenses.bin".into(),
            persist_expenses: true,
            log_filter: "expense_tracker_core=info".into(),
        }
    }

    /// Defaults overridden by the `EXPENSE_TRACKER_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            Some(dir) => Self::with_data_dir(dir.trim()),
            None => Self::default(),
        };

        if let Some(value) = lookup(PERSIST_EXPENSES_ENV) {
            config.persist_expenses = parse_bool(PERSIST_EXPENSES_ENV, &value)?;
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter.trim().to_string();
        }

        Ok(config)
    }

    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(&self.settings_file)
    }

    #[must_use]
    pub fn expenses_path(&self) -> PathBuf {
        self.data_dir.join(&self.expenses_file)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CoreError::Config(format!(
            "{key} must be a boolean (true/false/1/0), got '{other}'"
        ))),
    }
}
