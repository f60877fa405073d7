// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use annum::WrappedService;
use annum::domain::{Cents, Goal, SalaryRecord, Transaction};
use annum::storage::{MemoryStore, Repository};
use anyhow::Result;
use tempfile::TempDir;

pub const USER: &str = "user-1";

/// Helper to create a service over a temporary SQLite database
pub async fn test_service() -> Result<(WrappedService<Repository>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = WrappedService::<Repository>::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

pub fn debit(amount: Cents, category: &str, date: &str) -> Transaction {
    Transaction::debit(amount)
        .with_category(category)
        .with_date(date)
}

pub fn credit(amount: Cents, date: &str) -> Transaction {
    Transaction::credit(amount).with_date(date)
}

/// Test fixture: a year of records for one user
pub struct SampleYear;

impl SampleYear {
    pub fn transactions() -> Vec<Transaction> {
        vec![
            credit(5_000_000, "2026-01-01"),
            debit(1_800_000, "rent", "2026-01-03").with_description("January rent"),
            debit(45_000, "food", "2026-01-05"),
            debit(12_000, "food", "2026-01-17"),
            debit(9_000, "transport", "2026-02-02"),
            debit(250_000, "shopping", "2026-02-14").with_description("Headphones"),
            debit(30_000, "food", "2026-02-20"),
            debit(60_000, "entertainment", "2026-03-07"),
            debit(6_000, "health", "2026-03-11"),
            debit(1_800_000, "rent", "2026-03-03").with_description("March rent"),
            Transaction::new("transfer", 100_000).with_date("2026-03-15"),
        ]
    }

    pub fn salaries() -> Vec<SalaryRecord> {
        vec![
            SalaryRecord::new("2026-01", 4_000_000),
            SalaryRecord::new("2026-02", 4_000_000),
            SalaryRecord::new("2026-03", 4_000_000),
        ]
    }

    pub fn goals() -> Vec<Goal> {
        vec![
            Goal::new(10_000_000, 12_000_000).with_name("Emergency fund"),
            Goal::new(5_000_000, 1_000_000).with_name("Laptop"),
        ]
    }

    pub fn store() -> MemoryStore {
        MemoryStore::new()
            .with_user_name(USER, "Asha")
            .with_transactions(USER, Self::transactions())
            .with_salaries(USER, Self::salaries())
            .with_goals(USER, Self::goals())
    }
}
