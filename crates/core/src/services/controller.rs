use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::expense::{Expense, ExpenseCategory};
use crate::models::settings::DEFAULT_CURRENCY;

use super::dashboard_service::today;
use super::expense_store::ExpenseStore;
use super::settings_store::SettingsStore;

/// Unsubmitted input of the add-expense form.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    /// Raw amount text as typed; parsed on submit
    pub amount_text: String,
    pub category: ExpenseCategory,
    pub note: String,
    pub date: NaiveDate,
}

impl Default for ExpenseDraft {
    fn default() -> Self {
        Self {
            amount_text: String::new(),
            category: ExpenseCategory::Other,
            note: String::new(),
            date: today(),
        }
    }
}

/// Unsaved input of the settings form.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDraft {
    /// Raw monthly limit text as typed; parsed on submit
    pub budget_text: String,
    pub currency: String,
}

impl Default for SettingsDraft {
    fn default() -> Self {
        Self {
            budget_text: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Parse user-typed money text. Accepts only finite amounts greater than zero.
#[must_use]
pub fn parse_positive_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

/// Form state and user intents between the screens and the stores.
///
/// Nothing held here is persisted. Invalid form input is rejected without
/// an error and the form keeps what the user typed.
#[derive(Debug)]
pub struct PresentationController {
    expense_store: Arc<ExpenseStore>,
    settings_store: Arc<SettingsStore>,
    expense_draft: ExpenseDraft,
    settings_draft: SettingsDraft,
    category_filter: Option<ExpenseCategory>,
}

impl PresentationController {
    pub fn new(expense_store: Arc<ExpenseStore>, settings_store: Arc<SettingsStore>) -> Self {
        Self {
            expense_store,
            settings_store,
            expense_draft: ExpenseDraft::default(),
            settings_draft: SettingsDraft::default(),
            category_filter: None,
        }
    }

    // ── Add-expense form ────────────────────────────────────────────

    #[must_use]
    pub fn expense_draft(&self) -> &ExpenseDraft {
        &self.expense_draft
    }

    pub fn update_draft_amount(&mut self, text: impl Into<String>) {
        self.expense_draft.amount_text = text.into();
    }

    pub fn update_draft_category(&mut self, category: ExpenseCategory) {
        self.expense_draft.category = category;
    }

    pub fn update_draft_note(&mut self, text: impl Into<String>) {
        self.expense_draft.note = text.into();
    }

    pub fn update_draft_date(&mut self, date: NaiveDate) {
        self.expense_draft.date = date;
    }

    /// Whether `submit_expense` would accept the current draft.
    #[must_use]
    pub fn can_submit_expense(&self) -> bool {
        parse_positive_amount(&self.expense_draft.amount_text).is_some()
    }

    /// Turn the draft into an expense.
    ///
    /// Returns `Ok(None)` and keeps the draft when the amount does not parse
    /// to a positive number. On success the draft is reset and the new id
    /// returned.
    pub fn submit_expense(&mut self) -> Result<Option<String>, CoreError> {
        let Some(amount) = parse_positive_amount(&self.expense_draft.amount_text) else {
            debug!(amount = %self.expense_draft.amount_text, "expense draft rejected");
            return Ok(None);
        };

        let expense = Expense::with_note(
            amount,
            self.expense_draft.category,
            self.expense_draft.date,
            self.expense_draft.note.clone(),
        );
        let id = self.expense_store.add(expense)?;
        self.expense_draft = ExpenseDraft::default();
        Ok(Some(id))
    }

    /// Delete an expense. Confirmation is up to the screen.
    pub fn remove_expense(&self, id: &str) -> Result<bool, CoreError> {
        self.expense_store.delete(id)
    }

    // ── Expense list ────────────────────────────────────────────────

    #[must_use]
    pub fn category_filter(&self) -> Option<ExpenseCategory> {
        self.category_filter
    }

    /// `None` shows every category.
    pub fn set_category_filter(&mut self, category: Option<ExpenseCategory>) {
        self.category_filter = category;
    }

    /// Store contents restricted to the active filter, newest date first.
    #[must_use]
    pub fn filtered_expenses(&self) -> Vec<Expense> {
        let mut expenses = match self.category_filter {
            Some(category) => self.expense_store.expenses_by_category(category),
            None => self.expense_store.snapshot(),
        };
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses
    }

    /// Sum of `filtered_expenses`.
    #[must_use]
    pub fn filtered_total(&self) -> f64 {
        self.filtered_expenses().iter().map(|e| e.amount).sum()
    }

    // ── Settings form ───────────────────────────────────────────────

    #[must_use]
    pub fn settings_draft(&self) -> &SettingsDraft {
        &self.settings_draft
    }

    pub fn update_settings_budget(&mut self, text: impl Into<String>) {
        self.settings_draft.budget_text = text.into();
    }

    pub fn update_settings_currency(&mut self, currency: impl Into<String>) {
        self.settings_draft.currency = currency.into();
    }

    #[must_use]
    pub fn can_submit_settings(&self) -> bool {
        parse_positive_amount(&self.settings_draft.budget_text).is_some()
    }

    /// Save the settings draft. Returns `Ok(false)` without writing when the
    /// budget text is not a positive number.
    pub async fn submit_settings(&self) -> Result<bool, CoreError> {
        let Some(limit) = parse_positive_amount(&self.settings_draft.budget_text) else {
            debug!(budget = %self.settings_draft.budget_text, "settings draft rejected");
            return Ok(false);
        };

        self.settings_store
            .write_budget(limit, &self.settings_draft.currency)
            .await?;
        Ok(true)
    }

    pub async fn set_dark_mode(&self, dark_mode: bool) -> Result<(), CoreError> {
        self.settings_store.write_dark_mode(dark_mode).await
    }

    /// Reset the settings draft to what is currently persisted.
    /// Call whenever the settings screen is shown.
    pub fn load_draft_from_settings(&mut self) {
        let settings = self.settings_store.current();
        self.settings_draft = SettingsDraft {
            budget_text: settings.budget.monthly_limit.to_string(),
            currency: settings.budget.currency,
        };
        debug!(budget = %self.settings_draft.budget_text, "settings draft loaded");
    }
}
