use serde::{Deserialize, Serialize};

use super::expense::Expense;
use super::settings::DEFAULT_CURRENCY;

/// Number of entries the dashboard lists under "recent expenses".
pub const RECENT_EXPENSES_LIMIT: usize = 5;

/// Spending summary for the current month, derived from the expense list
/// and the settings. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Monthly limit from the budget
    pub total_budget: f64,

    /// Sum of all expense amounts dated in the current month
    pub total_spent: f64,

    /// total_budget - total_spent (negative when overspent)
    pub remaining_budget: f64,

    /// total_spent / total_budget clamped to at most 1.0; 0.0 for a non-positive budget
    pub spent_percentage: f64,

    /// Current-month expenses, in store insertion order
    pub monthly_expenses: Vec<Expense>,

    /// Currency symbol for display
    pub currency: String,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            total_budget: 0.0,
            total_spent: 0.0,
            remaining_budget: 0.0,
            spent_percentage: 0.0,
            monthly_expenses: Vec::new(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl DashboardState {
    /// The `limit` newest current-month expenses, newest first.
    #[must_use]
    pub fn recent_expenses(&self, limit: usize) -> Vec<&Expense> {
        let mut expenses: Vec<&Expense> = self.monthly_expenses.iter().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses.truncate(limit);
        expenses
    }

    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.remaining_budget < 0.0
    }
}
