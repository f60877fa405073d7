use serde::{Deserialize, Serialize};

use crate::domain::Cents;

/// The year-in-review report for one user.
/// Money fields are integer cents (₹1000.00 serializes as `100000`);
/// ratios are rounded floats. Totals clamp at `Cents::MAX` rather than wrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedSummary {
    pub year: i32,
    pub user_name: String,

    /// Cents
    pub total_income: Cents,
    /// Cents
    pub total_expenses: Cents,
    /// Cents, `total_income - total_expenses`
    pub total_savings: Cents,
    /// Cents, same as `total_savings`
    pub net_worth_change: Cents,

    pub total_transactions: usize,
    /// Cents, rounded half away from zero
    pub average_monthly_spending: Cents,

    pub top_categories: Vec<CategoryBreakdown>,
    pub most_consistent_category: String,

    pub biggest_transaction: Option<BiggestTransaction>,

    pub monthly_data: Vec<MonthlyData>,
    pub highest_spending_month: String,
    pub most_savings_month: String,

    pub goals_summary: GoalSummary,

    /// Cents, expenses over 365 days
    pub daily_average_spend: Cents,
    pub transactions_per_month: f64,
    pub top_spending_day_of_week: String,
    pub fun_comparisons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    /// Cents
    pub amount: Cents,
    /// Share of total expenses, one decimal place
    pub percentage: f64,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyData {
    /// "YYYY-MM", or whatever the raw dates sliced to
    pub month: String,
    /// All amounts in cents
    pub income: Cents,
    pub expenses: Cents,
    pub savings: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiggestTransaction {
    /// Cents
    pub amount: Cents,
    pub category: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub total_goals: usize,
    pub completed: usize,
    pub missed: usize,
    /// Cents
    pub total_saved: Cents,
    /// Cents
    pub total_target: Cents,
}

// Running totals for one expense category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAggregate {
    pub category: String,
    pub count: i64,
    pub total: Cents,
}
