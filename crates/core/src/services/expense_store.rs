use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::expense::{Expense, ExpenseCategory};
use crate::storage::manager::StorageManager;

use super::dashboard_service::today;

/// Owns the expense list and publishes every change.
///
/// The list keeps insertion order. Mutations are serialized and each one
/// publishes the complete new list, so subscribers never see a half-applied
/// change. When opened from a file, the new list is written before it is
/// published; a failed write leaves the published list untouched.
pub struct ExpenseStore {
    sender: watch::Sender<Vec<Expense>>,
    file: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for ExpenseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseStore")
            .field("expenses", &self.sender.borrow().len())
            .field("file", &self.file)
            .finish()
    }
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseStore {
    /// Empty store that lives only in memory.
    pub fn new() -> Self {
        Self::with_expenses(Vec::new())
    }

    /// In-memory store seeded with `expenses`.
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        let (sender, _) = watch::channel(expenses);
        Self {
            sender,
            file: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Store backed by an expense file. A missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let expenses = StorageManager::load_or_empty(&path)?;
        info!(path = %path.display(), count = expenses.len(), "expenses loaded");

        let mut store = Self::with_expenses(expenses);
        store.file = Some(path);
        Ok(store)
    }

    /// Path of the backing file, if the store persists.
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Subscribe to list changes.
    #[must_use]
    pub fn list(&self) -> watch::Receiver<Vec<Expense>> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Expense> {
        self.sender.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sender.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sender.borrow().is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Expense> {
        self.sender.borrow().iter().find(|e| e.id == id).cloned()
    }

    /// Append an expense and return its id.
    ///
    /// An empty id is replaced by a fresh UUID. Amounts must be finite and
    /// positive, and a caller-supplied id must not already be in the store.
    pub fn add(&self, mut expense: Expense) -> Result<String, CoreError> {
        if !expense.amount.is_finite() || expense.amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount must be positive, got {}",
                expense.amount
            )));
        }

        let supplied_id = !expense.id.trim().is_empty();
        if !supplied_id {
            expense.id = Uuid::new_v4().to_string();
        }
        let id = expense.id.clone();

        let _guard = self.lock_writes();
        let mut next = self.sender.borrow().clone();
        if supplied_id && next.iter().any(|e| e.id == id) {
            return Err(CoreError::DuplicateExpense(id));
        }
        next.push(expense);

        self.persist(&next)?;
        self.sender.send_replace(next);

        info!(%id, "expense added");
        Ok(id)
    }

    /// Remove the expense with `id`. Returns `false` (and changes nothing)
    /// when no such expense exists.
    pub fn delete(&self, id: &str) -> Result<bool, CoreError> {
        let _guard = self.lock_writes();
        let mut next = self.sender.borrow().clone();
        let Some(idx) = next.iter().position(|e| e.id == id) else {
            return Ok(false);
        };
        next.remove(idx);

        self.persist(&next)?;
        self.sender.send_replace(next);

        info!(%id, "expense removed");
        Ok(true)
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Expenses dated in the given calendar year and month (1-based).
    #[must_use]
    pub fn expenses_in_month(&self, year: i32, month: u32) -> Vec<Expense> {
        self.filtered(|e| e.is_in_month(year, month))
    }

    #[must_use]
    pub fn expenses_by_category(&self, category: ExpenseCategory) -> Vec<Expense> {
        self.filtered(|e| e.category == category)
    }

    /// Expenses dated within `[start, end]` (inclusive).
    #[must_use]
    pub fn expenses_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Expense> {
        self.filtered(|e| e.date >= start && e.date <= end)
    }

    #[must_use]
    pub fn expenses_for_current_month(&self) -> Vec<Expense> {
        let today = today();
        self.expenses_in_month(today.year(), today.month())
    }

    #[must_use]
    pub fn total_for_current_month(&self) -> f64 {
        self.expenses_for_current_month().iter().map(|e| e.amount).sum()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn filtered(&self, predicate: impl Fn(&Expense) -> bool) -> Vec<Expense> {
        self.sender
            .borrow()
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        if let Some(path) = &self.file {
            StorageManager::save_to_file(expenses, path)?;
        }
        Ok(())
    }
}
