use serde::{Deserialize, Serialize};

/// Monthly limit used when nothing has been persisted yet.
pub const DEFAULT_MONTHLY_LIMIT: f64 = 1000.0;

/// Currency symbol used when nothing has been persisted yet.
pub const DEFAULT_CURRENCY: &str = "€";

/// Currency symbols offered by the settings picker.
/// Other symbols are accepted by the store, they are just not offered.
pub const SUPPORTED_CURRENCIES: [&str; 5] = ["€", "$", "£", "¥", "CHF"];

/// Monthly spending limit and the currency symbol it is expressed in.
///
/// `monthly_limit > 0` is checked where the user edits it, not here:
/// a stored budget of zero is representable and yields a 0% dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub monthly_limit: f64,
    pub currency: String,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            monthly_limit: DEFAULT_MONTHLY_LIMIT,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// User-configurable settings, persisted in the key-value preference store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub budget: Budget,
}
