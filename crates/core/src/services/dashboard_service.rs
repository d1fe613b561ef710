use chrono::{Datelike, Local, NaiveDate};
use tokio::sync::watch;
use tracing::debug;

use crate::models::dashboard::DashboardState;
use crate::models::expense::Expense;
use crate::models::settings::AppSettings;

/// Today's date on the device clock.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fraction of `monthly_limit` consumed by `total_spent`, clamped to at most 1.0.
/// A non-positive limit yields 0.0.
#[must_use]
pub fn spent_percentage(total_spent: f64, monthly_limit: f64) -> f64 {
    if monthly_limit > 0.0 {
        (total_spent / monthly_limit).min(1.0)
    } else {
        0.0
    }
}

/// Dashboard for the month containing today. The date is read on every call.
#[must_use]
pub fn compute_dashboard(expenses: &[Expense], settings: &AppSettings) -> DashboardState {
    compute_dashboard_on(expenses, settings, today())
}

/// Dashboard for the month containing `today`.
///
/// Pure: the same inputs always give the same state. Overspending is kept
/// as a negative `remaining_budget`.
#[must_use]
pub fn compute_dashboard_on(
    expenses: &[Expense],
    settings: &AppSettings,
    today: NaiveDate,
) -> DashboardState {
    let monthly_expenses: Vec<Expense> = expenses
        .iter()
        .filter(|e| e.is_in_month(today.year(), today.month()))
        .cloned()
        .collect();

    let total_spent: f64 = monthly_expenses.iter().map(|e| e.amount).sum();
    let total_budget = settings.budget.monthly_limit;

    DashboardState {
        total_budget,
        total_spent,
        remaining_budget: total_budget - total_spent,
        spent_percentage: spent_percentage(total_spent, total_budget),
        monthly_expenses,
        currency: settings.budget.currency.clone(),
    }
}

/// Dashboard derived from the expense and settings channels, recomputed
/// only when one of them changed or the calendar month rolled over.
#[derive(Debug)]
pub struct DashboardProjection {
    expenses: watch::Receiver<Vec<Expense>>,
    settings: watch::Receiver<AppSettings>,
    /// (year, month) the cached state was computed for
    computed_for: Option<(i32, u32)>,
    state: DashboardState,
    recomputations: u64,
}

impl DashboardProjection {
    pub fn new(
        expenses: watch::Receiver<Vec<Expense>>,
        settings: watch::Receiver<AppSettings>,
    ) -> Self {
        Self {
            expenses,
            settings,
            computed_for: None,
            state: DashboardState::default(),
            recomputations: 0,
        }
    }

    /// Current dashboard as of today.
    pub fn current(&mut self) -> &DashboardState {
        self.current_on(today())
    }

    /// Current dashboard as of `today`; returns the cached state when
    /// nothing it depends on changed.
    pub fn current_on(&mut self, today: NaiveDate) -> &DashboardState {
        let month = (today.year(), today.month());
        // A closed channel keeps its last value, so it counts as unchanged.
        let upstream_changed = self.expenses.has_changed().unwrap_or(false)
            || self.settings.has_changed().unwrap_or(false);

        if upstream_changed || self.computed_for != Some(month) {
            let expenses = self.expenses.borrow_and_update();
            let settings = self.settings.borrow_and_update();
            self.state = compute_dashboard_on(&expenses, &settings, today);
            self.computed_for = Some(month);
            self.recomputations += 1;
            debug!(
                total_spent = self.state.total_spent,
                recomputations = self.recomputations,
                "dashboard recomputed"
            );
        }

        &self.state
    }

    /// How many times the state was actually recomputed.
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

/// Spawn a task that keeps a dashboard channel in sync with both upstreams.
///
/// The returned receiver holds the dashboard computed at spawn time and is
/// updated whenever either upstream changes and the output differs. The task
/// stops when both upstream senders are gone or every receiver is dropped.
/// Month rollover alone does not wake the task; use `DashboardProjection`
/// when the date matters. Must be called from within a tokio runtime.
pub fn spawn_dashboard(
    mut expenses: watch::Receiver<Vec<Expense>>,
    mut settings: watch::Receiver<AppSettings>,
) -> watch::Receiver<DashboardState> {
    let initial = compute_dashboard(&expenses.borrow_and_update(), &settings.borrow_and_update());
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        let mut expenses_open = true;
        let mut settings_open = true;

        loop {
            tokio::select! {
                changed = expenses.changed(), if expenses_open => {
                    expenses_open = changed.is_ok();
                }
                changed = settings.changed(), if settings_open => {
                    settings_open = changed.is_ok();
                }
                _ = tx.closed() => break,
            }

            if !expenses_open && !settings_open {
                break;
            }

            let state =
                compute_dashboard(&expenses.borrow_and_update(), &settings.borrow_and_update());
            let published = tx.send_if_modified(|current| {
                if *current == state {
                    false
                } else {
                    *current = state;
                    true
                }
            });
            debug!(published, "dashboard channel refreshed");
        }
    });

    rx
}
