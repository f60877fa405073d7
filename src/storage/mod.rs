mod memory;
mod repository;

pub use memory::*;
pub use repository::*;

use anyhow::Result;

use crate::domain::{Goal, SalaryRecord, Transaction};

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Read side of a record store, as the year-in-review needs it.
/// Implementations return records in their stored order.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Transactions whose date string starts with `year`.
    async fn fetch_transactions(&self, user_id: &str, year: i32) -> Result<Vec<Transaction>>;

    /// Salary records whose month string starts with `year`.
    async fn fetch_salaries(&self, user_id: &str, year: i32) -> Result<Vec<SalaryRecord>>;

    /// All goals of the user, regardless of year.
    async fn fetch_goals(&self, user_id: &str) -> Result<Vec<Goal>>;

    async fn fetch_user_name(&self, user_id: &str) -> Result<Option<String>>;
}
