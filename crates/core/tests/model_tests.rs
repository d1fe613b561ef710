// ═══════════════════════════════════════════════════════════════════
// Model Tests — ExpenseCategory, Expense, Budget, AppSettings,
// DashboardState
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use expense_tracker_core::models::dashboard::{DashboardState, RECENT_EXPENSES_LIMIT};
use expense_tracker_core::models::expense::{Expense, ExpenseCategory};
use expense_tracker_core::models::settings::{
    AppSettings, Budget, DEFAULT_CURRENCY, DEFAULT_MONTHLY_LIMIT, SUPPORTED_CURRENCIES,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── ExpenseCategory ─────────────────────────────────────────────────

mod category {
    use super::*;

    #[test]
    fn all_lists_seven_distinct_categories() {
        let all = ExpenseCategory::ALL;
        assert_eq!(all.len(), 7);
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 7);
        assert_eq!(all[0], ExpenseCategory::Food);
        assert_eq!(all[6], ExpenseCategory::Other);
    }

    #[test]
    fn default_is_other() {
        assert_eq!(ExpenseCategory::default(), ExpenseCategory::Other);
    }

    #[test]
    fn labels_and_glyphs() {
        assert_eq!(ExpenseCategory::Food.label(), "Essen");
        assert_eq!(ExpenseCategory::Food.glyph(), "🍽️");
        assert_eq!(ExpenseCategory::Bills.label(), "Rechnungen");
        assert_eq!(ExpenseCategory::Other.glyph(), "📦");
        for category in ExpenseCategory::ALL {
            assert!(!category.label().is_empty());
            assert!(!category.glyph().is_empty());
        }
    }

    #[test]
    fn display_uses_variant_name() {
        assert_eq!(ExpenseCategory::Entertainment.to_string(), "Entertainment");
        assert_eq!(ExpenseCategory::Health.to_string(), "Health");
    }

    #[test]
    fn serde_json_uses_variant_name() {
        let json = serde_json::to_string(&ExpenseCategory::Transport).unwrap();
        assert_eq!(json, "\"Transport\"");
        let back: ExpenseCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ExpenseCategory::Transport);
    }
}

// ── Expense ─────────────────────────────────────────────────────────

mod expense {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = Expense::new(10.0, ExpenseCategory::Food, date(2025, 3, 1));
        let b = Expense::new(10.0, ExpenseCategory::Food, date(2025, 3, 1));
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn new_has_no_note() {
        let e = Expense::new(10.0, ExpenseCategory::Food, date(2025, 3, 1));
        assert_eq!(e.note(), None);
    }

    #[test]
    fn with_note_keeps_note() {
        let e = Expense::with_note(4.5, ExpenseCategory::Food, date(2025, 3, 1), "coffee");
        assert_eq!(e.note(), Some("coffee"));
        assert_eq!(e.amount, 4.5);
    }

    #[test]
    fn is_in_month_matches_year_and_month() {
        let e = Expense::new(1.0, ExpenseCategory::Other, date(2025, 3, 31));
        assert!(e.is_in_month(2025, 3));
        assert!(!e.is_in_month(2025, 4));
        assert!(!e.is_in_month(2024, 3));
    }

    #[test]
    fn missing_note_deserializes_empty() {
        let json = r#"{"id":"x","amount":3.0,"category":"Bills","date":"2025-02-10"}"#;
        let e: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(e.note, "");
        assert_eq!(e.category, ExpenseCategory::Bills);
        assert_eq!(e.date, date(2025, 2, 10));
    }
}

// ── Settings ────────────────────────────────────────────────────────

mod settings {
    use super::*;

    #[test]
    fn budget_defaults() {
        let budget = Budget::default();
        assert_eq!(budget.monthly_limit, 1000.0);
        assert_eq!(budget.currency, "€");
        assert_eq!(DEFAULT_MONTHLY_LIMIT, 1000.0);
        assert_eq!(DEFAULT_CURRENCY, "€");
    }

    #[test]
    fn app_settings_defaults() {
        let settings = AppSettings::default();
        assert!(!settings.dark_mode);
        assert_eq!(settings.budget, Budget::default());
    }

    #[test]
    fn supported_currencies_start_with_default() {
        assert_eq!(SUPPORTED_CURRENCIES[0], DEFAULT_CURRENCY);
        assert!(SUPPORTED_CURRENCIES.contains(&"CHF"));
    }
}

// ── DashboardState ──────────────────────────────────────────────────

mod dashboard {
    use super::*;

    #[test]
    fn default_is_empty() {
        let state = DashboardState::default();
        assert_eq!(state.total_spent, 0.0);
        assert!(state.monthly_expenses.is_empty());
        assert_eq!(state.currency, DEFAULT_CURRENCY);
        assert!(!state.is_over_budget());
    }

    #[test]
    fn recent_expenses_newest_first_and_limited() {
        let monthly_expenses: Vec<Expense> = (1..=7)
            .map(|d| Expense::new(d as f64, ExpenseCategory::Food, date(2025, 5, d)))
            .collect();
        let state = DashboardState {
            monthly_expenses,
            ..DashboardState::default()
        };

        let recent = state.recent_expenses(RECENT_EXPENSES_LIMIT);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].date, date(2025, 5, 7));
        assert_eq!(recent[4].date, date(2025, 5, 3));
    }

    #[test]
    fn over_budget_when_remaining_negative() {
        let state = DashboardState {
            total_budget: 100.0,
            total_spent: 120.0,
            remaining_budget: -20.0,
            spent_percentage: 1.0,
            ..DashboardState::default()
        };
        assert!(state.is_over_budget());
    }
}
