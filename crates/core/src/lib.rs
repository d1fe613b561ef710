pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use config::TrackerConfig;
use errors::CoreError;
use models::{dashboard::DashboardState, settings::AppSettings};
use services::{
    controller::PresentationController,
    dashboard_service::{spawn_dashboard, DashboardProjection},
    expense_store::ExpenseStore,
    settings_store::SettingsStore,
};
use storage::kv::{JsonFileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

/// Install the `tracing` subscriber using the configured filter.
pub fn init(config: &TrackerConfig) {
    logging::init_tracing(&config.log_filter);
}

/// Main entry point for the Expense Tracker core library.
/// Wires the stores, the dashboard projection and the form controller.
#[must_use]
pub struct ExpenseTracker {
    config: Option<TrackerConfig>,
    expense_store: Arc<ExpenseStore>,
    settings_store: Arc<SettingsStore>,
    controller: PresentationController,
    dashboard: DashboardProjection,
}

impl std::fmt::Debug for ExpenseTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseTracker")
            .field("config", &self.config)
            .field("expenses", &self.expense_store.len())
            .field("settings", &self.settings_store.current())
            .finish()
    }
}

impl ExpenseTracker {
    /// Tracker with volatile settings and expenses. Nothing touches disk.
    pub async fn in_memory() -> Result<Self, CoreError> {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let settings_store = SettingsStore::open(backend).await?;
        Ok(Self::build(None, ExpenseStore::new(), settings_store))
    }

    /// Tracker backed by the files under `config.data_dir`.
    /// Expenses are kept in memory only when `persist_expenses` is off.
    pub async fn open(config: TrackerConfig) -> Result<Self, CoreError> {
        let backend: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileKeyValueStore::new(config.settings_path()));
        let settings_store = SettingsStore::open(backend).await?;

        let expense_store = if config.persist_expenses {
            ExpenseStore::open(config.expenses_path())?
        } else {
            ExpenseStore::new()
        };

        info!(
            data_dir = %config.data_dir.display(),
            persist_expenses = config.persist_expenses,
            "expense tracker opened"
        );
        Ok(Self::build(Some(config), expense_store, settings_store))
    }

    /// Configuration the tracker was opened with; `None` for in-memory trackers.
    #[must_use]
    pub fn config(&self) -> Option<&TrackerConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn controller(&self) -> &PresentationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PresentationController {
        &mut self.controller
    }

    #[must_use]
    pub fn expense_store(&self) -> &Arc<ExpenseStore> {
        &self.expense_store
    }

    #[must_use]
    pub fn settings_store(&self) -> &Arc<SettingsStore> {
        &self.settings_store
    }

    /// Latest persisted settings.
    #[must_use]
    pub fn settings(&self) -> AppSettings {
        self.settings_store.current()
    }

    /// Dashboard for the current month, recomputed only when needed.
    pub fn dashboard(&mut self) -> &DashboardState {
        self.dashboard.current()
    }

    /// Channel carrying the dashboard, refreshed on every upstream change.
    /// Must be called from within a tokio runtime.
    pub fn watch_dashboard(&self) -> watch::Receiver<DashboardState> {
        spawn_dashboard(self.expense_store.list(), self.settings_store.read())
    }

    fn build(
        config: Option<TrackerConfig>,
        expense_store: ExpenseStore,
        settings_store: SettingsStore,
    ) -> Self {
        let expense_store = Arc::new(expense_store);
        let settings_store = Arc::new(settings_store);
        let dashboard = DashboardProjection::new(expense_store.list(), settings_store.read());
        let controller =
            PresentationController::new(Arc::clone(&expense_store), Arc::clone(&settings_store));

        Self {
            config,
            expense_store,
            settings_store,
            controller,
            dashboard,
        }
    }
}
