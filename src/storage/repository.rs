use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Goal, SalaryRecord, Transaction};

use super::{MIGRATION_001_INITIAL, RecordStore};

/// Repository for persisting and querying users, transactions, salaries and goals.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // User operations
    // ========================

    /// Set (or replace) the display name of a user.
    pub async fn save_user_name(&self, user_id: &str, name: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, name) VALUES (?, ?)
            ON CONFLICT(user_id) DO UPDATE SET name = excluded.name
            "#,
        )
        .bind(user_id)
        .bind(name)
        .execute(&self.pool)
        .await
        .context("Failed to save user name")?;
        Ok(())
    }

    // ========================
    // Record writes
    // ========================

    pub async fn save_transaction(&self, user_id: &str, txn: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, amount_cents, type, category, date, description)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(txn.id.to_string())
        .bind(user_id)
        .bind(txn.amount_cents)
        .bind(&txn.kind)
        .bind(&txn.category)
        .bind(&txn.date)
        .bind(&txn.description)
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;
        Ok(())
    }

    /// Insert a salary, replacing the amount when the user already has one for that month.
    /// Returns the id of the stored row.
    pub async fn upsert_salary(&self, user_id: &str, salary: &SalaryRecord) -> Result<Uuid> {
        let row = sqlx::query(
            r#"
            INSERT INTO salaries (id, user_id, month, amount_cents)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, month) DO UPDATE SET amount_cents = excluded.amount_cents
            RETURNING id
            "#,
        )
        .bind(salary.id.to_string())
        .bind(user_id)
        .bind(&salary.month)
        .bind(salary.amount_cents)
        .fetch_one(&self.pool)
        .await
        .context("Failed to save salary")?;

        let id_str: String = row.get("id");
        Uuid::parse_str(&id_str).context("Invalid salary ID")
    }

    pub async fn save_goal(&self, user_id: &str, goal: &Goal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO goals (id, user_id, name, target_cents, current_cents)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(goal.id.to_string())
        .bind(user_id)
        .bind(&goal.name)
        .bind(goal.target_cents)
        .bind(goal.current_cents)
        .execute(&self.pool)
        .await
        .context("Failed to save goal")?;
        Ok(())
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            amount_cents: row.get("amount_cents"),
            kind: row.get("type"),
            category: row.get("category"),
            date: row.get("date"),
            description: row.get("description"),
        })
    }

    fn row_to_salary(row: &sqlx::sqlite::SqliteRow) -> Result<SalaryRecord> {
        let id_str: String = row.get("id");
        Ok(SalaryRecord {
            id: Uuid::parse_str(&id_str).context("Invalid salary ID")?,
            month: row.get("month"),
            amount_cents: row.get("amount_cents"),
        })
    }

    fn row_to_goal(row: &sqlx::sqlite::SqliteRow) -> Result<Goal> {
        let id_str: String = row.get("id");
        Ok(Goal {
            id: Uuid::parse_str(&id_str).context("Invalid goal ID")?,
            name: row.get("name"),
            target_cents: row.get("target_cents"),
            current_cents: row.get("current_cents"),
        })
    }
}

impl RecordStore for Repository {
    async fn fetch_transactions(&self, user_id: &str, year: i32) -> Result<Vec<Transaction>> {
        let prefix = year.to_string();
        let rows = sqlx::query(
            r#"
            SELECT id, amount_cents, type, category, date, description
            FROM transactions
            WHERE user_id = ? AND substr(date, 1, ?) = ?
            ORDER BY seq
            "#,
        )
        .bind(user_id)
        .bind(prefix.len() as i64)
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch transactions")?;

        debug!(user_id, year, count = rows.len(), "Fetched transactions");
        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn fetch_salaries(&self, user_id: &str, year: i32) -> Result<Vec<SalaryRecord>> {
        let prefix = year.to_string();
        let rows = sqlx::query(
            r#"
            SELECT id, month, amount_cents
            FROM salaries
            WHERE user_id = ? AND substr(month, 1, ?) = ?
            ORDER BY seq
            "#,
        )
        .bind(user_id)
        .bind(prefix.len() as i64)
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch salaries")?;

        debug!(user_id, year, count = rows.len(), "Fetched salaries");
        rows.iter().map(Self::row_to_salary).collect()
    }

    async fn fetch_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, target_cents, current_cents
            FROM goals
            WHERE user_id = ?
            ORDER BY seq
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch goals")?;

        debug!(user_id, count = rows.len(), "Fetched goals");
        rows.iter().map(Self::row_to_goal).collect()
    }

    async fn fetch_user_name(&self, user_id: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT name FROM users WHERE user_id = ? LIMIT 1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        Ok(row.and_then(|row| row.get::<Option<String>, _>("name")))
    }
}
