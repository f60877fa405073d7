use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type RecordId = Uuid;

/// Category used when a transaction carries none.
pub const DEFAULT_CATEGORY: &str = "misc";

/// Month key for transactions whose date is too short to slice.
pub const UNKNOWN_MONTH: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (income)
    Credit,
    /// Money going out (an expense)
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }

    /// Exact match only: "Debit" or " debit" are not debits.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "credit" => Some(TransactionKind::Credit),
            "debit" => Some(TransactionKind::Debit),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single money movement as stored, with every field possibly missing.
/// Accessors apply the defaults the aggregation relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub amount_cents: Option<Cents>,
    /// Raw type string; only "credit" and "debit" are meaningful
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    /// Expected as "YYYY-MM-DD" but kept verbatim
    pub date: Option<String>,
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(kind: impl Into<String>, amount_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount_cents: Some(amount_cents),
            kind: Some(kind.into()),
            category: None,
            date: None,
            description: None,
        }
    }

    pub fn debit(amount_cents: Cents) -> Self {
        Self::new(TransactionKind::Debit.as_str(), amount_cents)
    }

    pub fn credit(amount_cents: Cents) -> Self {
        Self::new(TransactionKind::Credit.as_str(), amount_cents)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount(&self) -> Cents {
        self.amount_cents.unwrap_or(0)
    }

    pub fn kind(&self) -> Option<TransactionKind> {
        self.kind.as_deref().and_then(TransactionKind::from_str)
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn date(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// The "YYYY-MM" bucket: the first seven characters of the raw date,
    /// or "unknown" when the date is shorter than that.
    pub fn month_key(&self) -> &str {
        let date = self.date();
        match date.char_indices().nth(7) {
            Some((end, _)) => &date[..end],
            None if date.chars().count() == 7 => date,
            None => UNKNOWN_MONTH,
        }
    }

    /// Weekday index with Monday = 0, only for strictly "YYYY-MM-DD" dates.
    pub fn weekday_index(&self) -> Option<usize> {
        NaiveDate::parse_from_str(self.date(), "%Y-%m-%d")
            .ok()
            .map(|d| d.weekday().num_days_from_monday() as usize)
    }

    pub fn in_year(&self, year: i32) -> bool {
        self.date().starts_with(&year.to_string())
    }
}

/// Salary deposited for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub id: RecordId,
    /// "YYYY-MM"
    pub month: Option<String>,
    pub amount_cents: Option<Cents>,
}

impl SalaryRecord {
    pub fn new(month: impl Into<String>, amount_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            month: Some(month.into()),
            amount_cents: Some(amount_cents),
        }
    }

    pub fn month(&self) -> &str {
        self.month.as_deref().unwrap_or("")
    }

    pub fn amount(&self) -> Cents {
        self.amount_cents.unwrap_or(0)
    }

    pub fn in_year(&self, year: i32) -> bool {
        self.month().starts_with(&year.to_string())
    }
}

/// A savings goal. Goals are not tied to a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: RecordId,
    pub name: Option<String>,
    pub target_cents: Option<Cents>,
    pub current_cents: Option<Cents>,
}

impl Goal {
    pub fn new(target_cents: Cents, current_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            target_cents: Some(target_cents),
            current_cents: Some(current_cents),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn target(&self) -> Cents {
        self.target_cents.unwrap_or(0)
    }

    pub fn current(&self) -> Cents {
        self.current_cents.unwrap_or(0)
    }

    /// A goal with a zero target can never be completed.
    pub fn is_completed(&self) -> bool {
        self.target() > 0 && self.current() >= self.target()
    }
}
