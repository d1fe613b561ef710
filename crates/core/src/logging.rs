use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber once per process.
///
/// `RUST_LOG` takes precedence; otherwise `default_filter` is used
/// (e.g. `expense_tracker_core=info`). Later calls are no-ops, and a
/// subscriber installed by the host application is left in place.
pub fn init_tracing(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        if fmt().with_env_filter(filter).try_init().is_ok() {
            tracing::info!("Expense tracker tracing initialized.");
        }
    });
}
