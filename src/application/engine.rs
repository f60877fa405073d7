use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::domain::{
    Cents, Goal, SalaryRecord, Transaction, TransactionKind, WrappedTables, divide_rounded,
    round_to, whole_units,
};

use super::{
    BiggestTransaction, CategoryAggregate, CategoryBreakdown, GoalSummary, MonthlyData,
    WrappedSummary,
};

pub const TOP_CATEGORY_LIMIT: usize = 5;

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const DAYS_PER_YEAR: i64 = 365;

/// Pure, synchronous aggregation of one user's records for one year.
/// Holds nothing but its lookup tables, so one engine can serve any number
/// of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct WrappedEngine {
    tables: WrappedTables,
}

impl WrappedEngine {
    pub fn new(tables: WrappedTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &WrappedTables {
        &self.tables
    }

    /// Build the year-in-review. Records are expected to be already
    /// filtered to `year` (goals are global); nothing here fails.
    pub fn summarize(
        &self,
        year: i32,
        user_name: &str,
        transactions: &[Transaction],
        salaries: &[SalaryRecord],
        goals: &[Goal],
    ) -> WrappedSummary {
        let mut ledger = ExpenseLedger::default();
        for txn in transactions {
            ledger.classify(txn);
        }

        let monthly_income = salary_by_month(salaries);
        let salary_total = saturating_total(monthly_income.values().copied());
        // Salaries act as a floor when transactions under-report income
        let total_income = ledger.credit_total.max(salary_total);
        let total_expenses = ledger.expense_total;
        let total_savings = total_income.saturating_sub(total_expenses);

        let monthly_data = monthly_data(&monthly_income, &ledger.monthly_expenses);
        let default_month = format!("{}-01", year);
        let highest_spending_month = max_key(
            ledger
                .monthly_expenses
                .iter()
                .map(|(month, expenses)| (month.as_str(), *expenses)),
        )
        .unwrap_or(default_month.as_str())
        .to_string();
        let most_savings_month = max_key(
            monthly_data
                .iter()
                .map(|m| (m.month.as_str(), m.savings)),
        )
        .unwrap_or(default_month.as_str())
        .to_string();

        let buckets = monthly_data.len().max(1);
        let average_monthly_spending = divide_rounded(total_expenses, buckets as i64);
        let daily_average_spend = divide_rounded(total_expenses, DAYS_PER_YEAR);
        let transactions_per_month = round_to(transactions.len() as f64 / buckets as f64, 1);

        debug!(
            year,
            transactions = transactions.len(),
            salaries = salaries.len(),
            goals = goals.len(),
            total_income,
            total_expenses,
            "Aggregated year"
        );

        WrappedSummary {
            year,
            user_name: user_name.to_string(),
            total_income,
            total_expenses,
            total_savings,
            net_worth_change: total_savings,
            total_transactions: transactions.len(),
            average_monthly_spending,
            top_categories: self.top_categories(&ledger, TOP_CATEGORY_LIMIT),
            most_consistent_category: ledger.most_consistent_category().to_string(),
            biggest_transaction: ledger.biggest.clone(),
            monthly_data,
            highest_spending_month,
            most_savings_month,
            goals_summary: goals_summary(goals),
            daily_average_spend,
            transactions_per_month,
            top_spending_day_of_week: ledger.top_weekday().to_string(),
            fun_comparisons: self.fun_comparisons(&ledger),
        }
    }

    fn top_categories(&self, ledger: &ExpenseLedger, limit: usize) -> Vec<CategoryBreakdown> {
        let mut sorted: Vec<&CategoryAggregate> = ledger.categories.iter().collect();
        // Stable: equal totals keep encounter order
        sorted.sort_by(|a, b| b.total.cmp(&a.total));

        sorted
            .into_iter()
            .take(limit)
            .map(|agg| CategoryBreakdown {
                category: agg.category.clone(),
                amount: agg.total,
                percentage: percentage_of(agg.total, ledger.expense_total),
                icon: self.tables.icon_for(&agg.category).to_string(),
            })
            .collect()
    }

    fn fun_comparisons(&self, ledger: &ExpenseLedger) -> Vec<String> {
        let mut sentences: Vec<String> = self
            .tables
            .fun_comparisons
            .iter()
            .filter_map(|comparison| {
                let spend = ledger.category_total(&comparison.category);
                let count = whole_units(spend, comparison.unit_price_cents);
                (count > 0).then(|| {
                    format!(
                        "You spent the equivalent of {} {} on {}!",
                        count, comparison.label, comparison.category
                    )
                })
            })
            .collect();

        if sentences.is_empty() && ledger.expense_total > 0 {
            let fallback = &self.tables.fallback;
            let count = whole_units(ledger.expense_total, fallback.unit_price_cents);
            if count > 0 {
                sentences.push(format!(
                    "Your total spending equals {} {}",
                    count, fallback.label
                ));
            }
        }

        sentences
    }
}

/// Single-pass accumulator over a year's transactions.
#[derive(Debug, Default)]
struct ExpenseLedger {
    credit_total: Cents,
    expense_total: Cents,
    /// In first-seen order
    categories: Vec<CategoryAggregate>,
    category_index: HashMap<String, usize>,
    monthly_expenses: BTreeMap<String, Cents>,
    weekday_spend: [Option<Cents>; 7],
    biggest: Option<BiggestTransaction>,
}

impl ExpenseLedger {
    fn classify(&mut self, txn: &Transaction) {
        match txn.kind() {
            Some(TransactionKind::Credit) => {
                self.credit_total = self.credit_total.saturating_add(txn.amount())
            }
            Some(TransactionKind::Debit) => self.record_debit(txn),
            None => debug!(
                id = %txn.id,
                kind = ?txn.kind,
                "Ignoring transaction with unknown type"
            ),
        }
    }

    fn record_debit(&mut self, txn: &Transaction) {
        let amount = txn.amount();
        let category = txn.category();
        self.expense_total = self.expense_total.saturating_add(amount);

        let idx = match self.category_index.get(category) {
            Some(idx) => *idx,
            None => {
                self.categories.push(CategoryAggregate {
                    category: category.to_string(),
                    count: 0,
                    total: 0,
                });
                self.category_index
                    .insert(category.to_string(), self.categories.len() - 1);
                self.categories.len() - 1
            }
        };
        let aggregate = &mut self.categories[idx];
        aggregate.total = aggregate.total.saturating_add(amount);
        aggregate.count += 1;

        let month = self
            .monthly_expenses
            .entry(txn.month_key().to_string())
            .or_insert(0);
        *month = month.saturating_add(amount);

        match txn.weekday_index() {
            Some(day) => {
                let spend = self.weekday_spend[day].get_or_insert(0);
                *spend = spend.saturating_add(amount);
            }
            None => debug!(
                id = %txn.id,
                date = txn.date(),
                "Skipping weekday for unparseable date"
            ),
        }

        if self.biggest.as_ref().is_none_or(|b| amount > b.amount) {
            self.biggest = Some(BiggestTransaction {
                amount,
                category: category.to_string(),
                date: txn.date().to_string(),
                description: txn.description().to_string(),
            });
        }
    }

    fn category_total(&self, category: &str) -> Cents {
        self.category_index
            .get(category)
            .map(|idx| self.categories[*idx].total)
            .unwrap_or(0)
    }

    /// Most debits by count; the first category seen wins a tie.
    fn most_consistent_category(&self) -> &str {
        let mut best: Option<&CategoryAggregate> = None;
        for agg in &self.categories {
            if best.is_none_or(|b| agg.count > b.count) {
                best = Some(agg);
            }
        }
        best.map(|agg| agg.category.as_str()).unwrap_or("none")
    }

    /// Earliest weekday wins a tie; Monday when no date parsed.
    fn top_weekday(&self) -> &'static str {
        let mut best: Option<(usize, Cents)> = None;
        for (day, spend) in self.weekday_spend.iter().enumerate() {
            if let Some(spend) = *spend {
                if best.is_none_or(|(_, b)| spend > b) {
                    best = Some((day, spend));
                }
            }
        }
        best.and_then(|(day, _)| DAY_NAMES.get(day).copied())
            .unwrap_or(DAY_NAMES[0])
    }
}

/// Salary per month; a later record for the same month replaces an earlier one.
fn salary_by_month(salaries: &[SalaryRecord]) -> BTreeMap<String, Cents> {
    salaries
        .iter()
        .map(|s| (s.month().to_string(), s.amount()))
        .collect()
}

fn monthly_data(
    income: &BTreeMap<String, Cents>,
    expenses: &BTreeMap<String, Cents>,
) -> Vec<MonthlyData> {
    let months: BTreeSet<&String> = income.keys().chain(expenses.keys()).collect();
    months
        .into_iter()
        .map(|month| {
            let income = income.get(month).copied().unwrap_or(0);
            let expenses = expenses.get(month).copied().unwrap_or(0);
            MonthlyData {
                month: month.clone(),
                income,
                expenses,
                savings: income.saturating_sub(expenses),
            }
        })
        .collect()
}

/// Key with the largest value, scanning in the given order; the first wins a tie.
fn max_key<'a>(entries: impl Iterator<Item = (&'a str, Cents)>) -> Option<&'a str> {
    let mut best: Option<(&str, Cents)> = None;
    for (key, value) in entries {
        if best.is_none_or(|(_, b)| value > b) {
            best = Some((key, value));
        }
    }
    best.map(|(key, _)| key)
}

fn percentage_of(amount: Cents, total: Cents) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round_to(amount as f64 / total as f64 * 100.0, 1)
}

fn goals_summary(goals: &[Goal]) -> GoalSummary {
    let completed = goals.iter().filter(|g| g.is_completed()).count();
    GoalSummary {
        total_goals: goals.len(),
        completed,
        missed: goals.len() - completed,
        total_saved: saturating_total(goals.iter().map(Goal::current)),
        total_target: saturating_total(goals.iter().map(Goal::target)),
    }
}

/// Sums clamp at the `Cents` bounds instead of wrapping.
fn saturating_total(amounts: impl Iterator<Item = Cents>) -> Cents {
    amounts.fold(0, Cents::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FunComparison;

    fn debit(amount: Cents, category: &str, date: &str) -> Transaction {
        Transaction::debit(amount)
            .with_category(category)
            .with_date(date)
    }

    fn summarize(transactions: &[Transaction], salaries: &[SalaryRecord]) -> WrappedSummary {
        WrappedEngine::default().summarize(2026, "Asha", transactions, salaries, &[])
    }

    #[test]
    fn test_unknown_types_only_count_as_transactions() {
        let txns = vec![
            Transaction::new("refund", 5000).with_date("2026-02-01"),
            Transaction::new("DEBIT", 5000).with_date("2026-02-01"),
            debit(1000, "food", "2026-02-01"),
        ];
        let summary = summarize(&txns, &[]);

        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.total_expenses, 1000);
        assert_eq!(summary.total_income, 0);
        assert_eq!(summary.monthly_data.len(), 1);
    }

    #[test]
    fn test_salary_floor_and_last_seen_wins() {
        let txns = vec![Transaction::credit(10000).with_date("2026-01-01")];
        let salaries = vec![
            SalaryRecord::new("2026-01", 50000),
            SalaryRecord::new("2026-02", 50000),
            SalaryRecord::new("2026-01", 60000),
        ];
        let summary = summarize(&txns, &salaries);

        assert_eq!(summary.total_income, 110000);
        assert_eq!(summary.monthly_data[0].income, 60000);
        assert_eq!(summary.total_savings, 110000);
    }

    #[test]
    fn test_top_categories_stable_on_ties() {
        let txns = vec![
            debit(500, "b", "2026-01-01"),
            debit(500, "a", "2026-01-01"),
            debit(900, "c", "2026-01-01"),
            debit(100, "d", "2026-01-01"),
            debit(100, "e", "2026-01-01"),
            debit(100, "f", "2026-01-01"),
        ];
        let summary = summarize(&txns, &[]);
        let names: Vec<&str> = summary
            .top_categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();

        assert_eq!(names, vec!["c", "b", "a", "d", "e"]);
        assert_eq!(summary.top_categories[0].icon, "📊");
        assert_eq!(summary.top_categories[0].percentage, 40.9); // 900 / 2200
    }

    #[test]
    fn test_most_consistent_counts_not_amounts() {
        let txns = vec![
            debit(100000, "rent", "2026-01-01"),
            debit(100, "food", "2026-01-02"),
            debit(100, "food", "2026-01-03"),
            debit(100, "transport", "2026-01-04"),
            debit(100, "transport", "2026-01-05"),
        ];
        let summary = summarize(&txns, &[]);

        // food and transport tie; food was seen first
        assert_eq!(summary.most_consistent_category, "food");
    }

    #[test]
    fn test_biggest_transaction_first_wins_tie() {
        let txns = vec![
            debit(700, "food", "2026-01-01").with_description("first"),
            debit(700, "food", "2026-01-02").with_description("second"),
            Transaction::credit(90000).with_date("2026-01-03"),
        ];
        let summary = summarize(&txns, &[]);
        let biggest = summary.biggest_transaction.unwrap();

        assert_eq!(biggest.amount, 700);
        assert_eq!(biggest.description, "first");
        assert_eq!(biggest.date, "2026-01-01");
    }

    #[test]
    fn test_month_ties_pick_earliest_month() {
        let txns = vec![
            debit(500, "food", "2026-03-01"),
            debit(500, "food", "2026-01-01"),
        ];
        let summary = summarize(&txns, &[]);

        assert_eq!(summary.highest_spending_month, "2026-01");
        assert_eq!(summary.most_savings_month, "2026-01");
    }

    #[test]
    fn test_most_savings_month_includes_income_only_months() {
        let txns = vec![debit(500, "food", "2026-01-10")];
        let salaries = vec![
            SalaryRecord::new("2026-01", 1000),
            SalaryRecord::new("2026-02", 800),
        ];
        let summary = summarize(&txns, &salaries);

        assert_eq!(summary.highest_spending_month, "2026-01");
        assert_eq!(summary.most_savings_month, "2026-02");
        assert_eq!(summary.monthly_data[0].savings, 500);
        assert_eq!(summary.monthly_data[1].expenses, 0);
    }

    #[test]
    fn test_negative_savings_month() {
        let txns = vec![debit(5000, "rent", "2026-04-01")];
        let salaries = vec![SalaryRecord::new("2026-04", 1000)];
        let summary = summarize(&txns, &salaries);

        assert_eq!(summary.monthly_data[0].savings, -4000);
        assert_eq!(summary.total_income, 1000);
        assert_eq!(summary.total_savings, -4000);
    }

    #[test]
    fn test_weekday_skips_unparseable_dates() {
        let txns = vec![
            debit(100, "food", "2026-01-06"),  // Tuesday
            debit(900, "food", "2026/01/07"), // no weekday
        ];
        let summary = summarize(&txns, &[]);

        assert_eq!(summary.top_spending_day_of_week, "Tuesday");
        assert_eq!(summary.total_expenses, 1000);
        assert_eq!(summary.monthly_data.len(), 2);
        assert_eq!(summary.monthly_data[1].month, "2026/01");
    }

    #[test]
    fn test_weekday_ties_pick_earliest_day() {
        let txns = vec![
            debit(700, "food", "2026-01-09"), // Friday
            debit(700, "food", "2026-01-06"), // Tuesday
            debit(100, "food", "2026-01-05"), // Monday
        ];
        let summary = summarize(&txns, &[]);

        assert_eq!(summary.top_spending_day_of_week, "Tuesday");
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let huge: Cents = 5_000_000_000_000_000_000;
        let txns = vec![
            debit(huge, "rent", "2026-01-05"),
            debit(huge, "rent", "2026-01-05"),
            Transaction::credit(huge).with_date("2026-01-01"),
            Transaction::credit(huge).with_date("2026-01-01"),
        ];
        let salaries = vec![
            SalaryRecord::new("2026-01", huge),
            SalaryRecord::new("2026-02", huge),
        ];
        let summary = summarize(&txns, &salaries);

        assert_eq!(summary.total_expenses, Cents::MAX);
        assert_eq!(summary.total_income, Cents::MAX);
        assert_eq!(summary.total_savings, 0);
        assert_eq!(summary.top_categories[0].amount, Cents::MAX);
        assert_eq!(summary.monthly_data[0].expenses, Cents::MAX);
        assert_eq!(summary.monthly_data[0].savings, huge - Cents::MAX);
        assert_eq!(summary.top_spending_day_of_week, "Monday");
    }

    #[test]
    fn test_weekday_defaults_to_monday() {
        let summary = summarize(&[debit(100, "food", "bad")], &[]);
        assert_eq!(summary.top_spending_day_of_week, "Monday");
        assert_eq!(summary.monthly_data[0].month, "unknown");
    }

    #[test]
    fn test_fun_comparisons_follow_table_order() {
        let txns = vec![
            debit(6000, "transport", "2026-01-01"),
            debit(60000, "food", "2026-01-02"),
        ];
        let summary = summarize(&txns, &[]);

        assert_eq!(
            summary.fun_comparisons,
            vec![
                "You spent the equivalent of 2 cups of chai ☕ on food!",
                "You spent the equivalent of 1 plates of biryani 🍛 on food!",
                "You spent the equivalent of 2 auto rides 🛺 on transport!",
            ]
        );
    }

    #[test]
    fn test_fun_comparison_fallback_on_total() {
        // "groceries" has no table row, so the total-spend fallback applies
        let summary = summarize(&[debit(80000, "groceries", "2026-01-01")], &[]);
        assert_eq!(
            summary.fun_comparisons,
            vec!["Your total spending equals 3 cups of chai ☕"]
        );
    }

    #[test]
    fn test_fun_comparison_fallback_suppressed_below_one_unit() {
        let summary = summarize(&[debit(10000, "groceries", "2026-01-01")], &[]);
        assert!(summary.fun_comparisons.is_empty());
    }

    #[test]
    fn test_custom_tables() {
        let tables = WrappedTables {
            fun_comparisons: vec![FunComparison::new("books", 1000, "paperbacks")],
            ..WrappedTables::default()
        };
        let engine = WrappedEngine::new(tables);
        let txns = vec![debit(3500, "books", "2026-01-01")];
        let summary = engine.summarize(2026, "Asha", &txns, &[], &[]);

        assert_eq!(
            summary.fun_comparisons,
            vec!["You spent the equivalent of 3 paperbacks on books!"]
        );
    }

    #[test]
    fn test_averages_guard_against_empty_months() {
        let summary = summarize(&[], &[]);

        assert_eq!(summary.average_monthly_spending, 0);
        assert_eq!(summary.transactions_per_month, 0.0);
        assert_eq!(summary.highest_spending_month, "2026-01");
        assert_eq!(summary.most_savings_month, "2026-01");
    }

    #[test]
    fn test_per_month_averages() {
        let txns = vec![
            debit(1000, "food", "2026-01-01"),
            debit(1000, "food", "2026-01-02"),
            debit(1000, "food", "2026-02-01"),
            Transaction::credit(500).with_date("2026-03-01"),
        ];
        let salaries = vec![SalaryRecord::new("2026-03", 500)];
        let summary = summarize(&txns, &salaries);

        // three buckets: Jan, Feb and the salary-only March
        assert_eq!(summary.monthly_data.len(), 3);
        assert_eq!(summary.average_monthly_spending, 1000);
        assert_eq!(summary.transactions_per_month, 1.3);
        assert_eq!(summary.daily_average_spend, 8); // 3000 / 365
    }

    #[test]
    fn test_goals_summary() {
        let goals = vec![
            Goal::new(10000, 12000),
            Goal::new(10000, 5000),
            Goal::new(0, 0),
        ];
        let summary = WrappedEngine::default().summarize(2026, "Asha", &[], &[], &goals);

        assert_eq!(
            summary.goals_summary,
            GoalSummary {
                total_goals: 3,
                completed: 1,
                missed: 2,
                total_saved: 17000,
                total_target: 20000,
            }
        );
    }
}
