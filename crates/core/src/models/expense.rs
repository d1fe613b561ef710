use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Spending category of an expense.
/// Closed set; the UI renders each variant with its label and glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Health,
    Bills,
    #[default]
    Other,
}

impl ExpenseCategory {
    /// Every category, in picker order.
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Shopping,
        ExpenseCategory::Health,
        ExpenseCategory::Bills,
        ExpenseCategory::Other,
    ];

    /// Display label shown next to the glyph.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Essen",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Entertainment => "Unterhaltung",
            ExpenseCategory::Shopping => "Einkaufen",
            ExpenseCategory::Health => "Gesundheit",
            ExpenseCategory::Bills => "Rechnungen",
            ExpenseCategory::Other => "Sonstiges",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "🍽️",
            ExpenseCategory::Transport => "🚗",
            ExpenseCategory::Entertainment => "🎬",
            ExpenseCategory::Shopping => "🛍️",
            ExpenseCategory::Health => "🏥",
            ExpenseCategory::Bills => "📄",
            ExpenseCategory::Other => "📦",
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseCategory::Food => write!(f, "Food"),
            ExpenseCategory::Transport => write!(f, "Transport"),
            ExpenseCategory::Entertainment => write!(f, "Entertainment"),
            ExpenseCategory::Shopping => write!(f, "Shopping"),
            ExpenseCategory::Health => write!(f, "Health"),
            ExpenseCategory::Bills => write!(f, "Bills"),
            ExpenseCategory::Other => write!(f, "Other"),
        }
    }
}

/// A single recorded expense.
///
/// Expenses are never edited in place: the store only appends and removes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier. Left empty, the store assigns a UUID on insert.
    pub id: String,

    /// Amount spent (always positive)
    pub amount: f64,

    pub category: ExpenseCategory,

    /// Calendar date of the expense (daily granularity)
    pub date: NaiveDate,

    /// Free-text note; empty means no note
    #[serde(default)]
    pub note: String,
}

impl Expense {
    pub fn new(amount: f64, category: ExpenseCategory, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            category,
            date,
            note: String::new(),
        }
    }

    /// Create an expense with a note attached.
    pub fn with_note(
        amount: f64,
        category: ExpenseCategory,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> Self {
        Self {
            note: note.into(),
            ..Self::new(amount, category, date)
        }
    }

    /// `true` if the expense falls in the given calendar year and month (1-based).
    #[must_use]
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }

    /// The note, or `None` when empty.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        if self.note.is_empty() {
            None
        } else {
            Some(&self.note)
        }
    }
}
