use tracing::info;

use crate::domain::{Cents, Goal, SalaryRecord, Transaction, TransactionKind, WrappedTables};
use crate::storage::{RecordStore, Repository};

use super::{AppError, WrappedEngine, WrappedSummary};

/// Display name used when the store has none for the user.
pub const DEFAULT_USER_NAME: &str = "User";

/// Application service tying a record store to the year-in-review engine.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct WrappedService<S> {
    store: S,
    engine: WrappedEngine,
}

impl<S: RecordStore> WrappedService<S> {
    /// Create a service over the given store with the built-in tables.
    pub fn new(store: S) -> Self {
        Self {
            store,
            engine: WrappedEngine::default(),
        }
    }

    /// Replace the icon and comparison tables.
    pub fn with_tables(mut self, tables: WrappedTables) -> Self {
        self.engine = WrappedEngine::new(tables);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch a user's records for `year` and summarize them.
    /// Store failures are returned as-is; no partial summary is built.
    pub async fn get_wrapped_summary(
        &self,
        user_id: &str,
        year: i32,
    ) -> Result<WrappedSummary, AppError> {
        let transactions = self.store.fetch_transactions(user_id, year).await?;
        let salaries = self.store.fetch_salaries(user_id, year).await?;
        let goals = self.store.fetch_goals(user_id).await?;
        let user_name = self
            .store
            .fetch_user_name(user_id)
            .await?
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());

        let summary = self
            .engine
            .summarize(year, &user_name, &transactions, &salaries, &goals);

        info!(
            user_id,
            year,
            transactions = summary.total_transactions,
            "Built wrapped summary"
        );
        Ok(summary)
    }
}

impl WrappedService<Repository> {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    pub async fn set_user_name(&self, user_id: &str, name: &str) -> Result<(), AppError> {
        ensure_user_id(user_id)?;
        self.store.save_user_name(user_id, name).await?;
        Ok(())
    }

    /// Record a transaction. Dates and categories are stored verbatim.
    pub async fn record_transaction(
        &self,
        user_id: &str,
        kind: TransactionKind,
        amount_cents: Cents,
        date: Option<String>,
        category: Option<String>,
        description: Option<String>,
    ) -> Result<Transaction, AppError> {
        ensure_user_id(user_id)?;
        ensure_non_negative(amount_cents)?;

        let mut txn = Transaction::new(kind.as_str(), amount_cents);
        txn.date = date;
        txn.category = category;
        txn.description = description;

        self.store.save_transaction(user_id, &txn).await?;
        Ok(txn)
    }

    /// Record the salary for a month, replacing any earlier amount for it.
    pub async fn record_salary(
        &self,
        user_id: &str,
        month: String,
        amount_cents: Cents,
    ) -> Result<SalaryRecord, AppError> {
        ensure_user_id(user_id)?;
        ensure_non_negative(amount_cents)?;

        let mut salary = SalaryRecord::new(month, amount_cents);
        salary.id = self.store.upsert_salary(user_id, &salary).await?;
        Ok(salary)
    }

    pub async fn record_goal(
        &self,
        user_id: &str,
        name: Option<String>,
        target_cents: Cents,
        current_cents: Cents,
    ) -> Result<Goal, AppError> {
        ensure_user_id(user_id)?;
        ensure_non_negative(target_cents)?;
        ensure_non_negative(current_cents)?;

        let mut goal = Goal::new(target_cents, current_cents);
        goal.name = name;

        self.store.save_goal(user_id, &goal).await?;
        Ok(goal)
    }
}

fn ensure_non_negative(amount_cents: Cents) -> Result<(), AppError> {
    if amount_cents < 0 {
        return Err(AppError::NegativeAmount(amount_cents));
    }
    Ok(())
}

fn ensure_user_id(user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::EmptyUserId);
    }
    Ok(())
}
