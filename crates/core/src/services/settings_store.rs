use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::settings::{AppSettings, Budget, DEFAULT_CURRENCY, DEFAULT_MONTHLY_LIMIT};
use crate::storage::kv::{KeyValueStore, PrefValue};

pub const DARK_MODE_KEY: &str = "dark_mode";
pub const BUDGET_LIMIT_KEY: &str = "budget_limit";
pub const CURRENCY_KEY: &str = "currency";

/// Owns the persisted `AppSettings` and publishes every change.
///
/// Readers subscribe through `read()`: they see the current value right away
/// and then only the latest value after each write. The published value
/// changes only after the backend accepted the write.
pub struct SettingsStore {
    backend: Arc<dyn KeyValueStore>,
    sender: watch::Sender<AppSettings>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("backend", &self.backend.name())
            .field("settings", &*self.sender.borrow())
            .finish()
    }
}

impl SettingsStore {
    /// Load settings from `backend`. Missing keys fall back to the defaults.
    pub async fn open(backend: Arc<dyn KeyValueStore>) -> Result<Self, CoreError> {
        let values = backend.load_all().await?;
        let settings = settings_from_prefs(&values);
        info!(backend = backend.name(), ?settings, "settings loaded");

        let (sender, _) = watch::channel(settings);
        Ok(Self {
            backend,
            sender,
            write_lock: Mutex::new(()),
        })
    }

    /// Subscribe to settings changes.
    #[must_use]
    pub fn read(&self) -> watch::Receiver<AppSettings> {
        self.sender.subscribe()
    }

    /// Snapshot of the latest settings.
    #[must_use]
    pub fn current(&self) -> AppSettings {
        self.sender.borrow().clone()
    }

    /// Persist the dark-mode flag. Leaves the budget untouched.
    pub async fn write_dark_mode(&self, dark_mode: bool) -> Result<(), CoreError> {
        let _guard = self.write_lock.lock().await;
        self.backend
            .write_batch(vec![(DARK_MODE_KEY.to_string(), PrefValue::Bool(dark_mode))])
            .await?;

        self.sender.send_if_modified(|settings| {
            if settings.dark_mode == dark_mode {
                false
            } else {
                settings.dark_mode = dark_mode;
                true
            }
        });
        info!(dark_mode, "dark mode written");
        Ok(())
    }

    /// Persist monthly limit and currency together.
    /// No validation here; callers check the limit before saving.
    pub async fn write_budget(&self, monthly_limit: f64, currency: &str) -> Result<(), CoreError> {
        let _guard = self.write_lock.lock().await;
        self.backend
            .write_batch(vec![
                (BUDGET_LIMIT_KEY.to_string(), PrefValue::Double(monthly_limit)),
                (CURRENCY_KEY.to_string(), PrefValue::Text(currency.to_string())),
            ])
            .await?;

        let budget = Budget {
            monthly_limit,
            currency: currency.to_string(),
        };
        self.sender.send_if_modified(|settings| {
            if settings.budget == budget {
                false
            } else {
                settings.budget = budget;
                true
            }
        });
        info!(monthly_limit, currency, "budget written");
        Ok(())
    }
}

/// Build settings from raw preference values.
///
/// Absent keys take the defaults. A key holding the wrong type is treated
/// as absent and logged.
pub fn settings_from_prefs(values: &HashMap<String, PrefValue>) -> AppSettings {
    let dark_mode = read_key(values, DARK_MODE_KEY, PrefValue::as_bool).unwrap_or(false);
    let monthly_limit =
        read_key(values, BUDGET_LIMIT_KEY, PrefValue::as_f64).unwrap_or(DEFAULT_MONTHLY_LIMIT);
    let currency = read_key(values, CURRENCY_KEY, |v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    AppSettings {
        dark_mode,
        budget: Budget {
            monthly_limit,
            currency,
        },
    }
}

fn read_key<T>(
    values: &HashMap<String, PrefValue>,
    key: &str,
    extract: impl Fn(&PrefValue) -> Option<T>,
) -> Option<T> {
    let value = values.get(key)?;
    let extracted = extract(value);
    if extracted.is_none() {
        warn!(key, ?value, "unexpected preference type, using default");
    }
    extracted
}
