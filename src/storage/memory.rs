use std::collections::HashMap;

use anyhow::Result;

use crate::domain::{Goal, SalaryRecord, Transaction};

use super::RecordStore;

#[derive(Debug, Clone, Default)]
struct UserRecords {
    name: Option<String>,
    transactions: Vec<Transaction>,
    salaries: Vec<SalaryRecord>,
    goals: Vec<Goal>,
}

/// In-memory record store. Keeps records in insertion order and applies the
/// same year filters as the SQLite repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: HashMap<String, UserRecords>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn user_mut(&mut self, user_id: &str) -> &mut UserRecords {
        self.users.entry(user_id.to_string()).or_default()
    }

    pub fn set_user_name(&mut self, user_id: &str, name: impl Into<String>) {
        self.user_mut(user_id).name = Some(name.into());
    }

    pub fn add_transaction(&mut self, user_id: &str, txn: Transaction) {
        self.user_mut(user_id).transactions.push(txn);
    }

    /// Duplicate months are kept; the aggregation lets the later one win.
    pub fn add_salary(&mut self, user_id: &str, salary: SalaryRecord) {
        self.user_mut(user_id).salaries.push(salary);
    }

    pub fn add_goal(&mut self, user_id: &str, goal: Goal) {
        self.user_mut(user_id).goals.push(goal);
    }

    pub fn with_transactions(
        mut self,
        user_id: &str,
        txns: impl IntoIterator<Item = Transaction>,
    ) -> Self {
        self.user_mut(user_id).transactions.extend(txns);
        self
    }

    pub fn with_salaries(
        mut self,
        user_id: &str,
        salaries: impl IntoIterator<Item = SalaryRecord>,
    ) -> Self {
        self.user_mut(user_id).salaries.extend(salaries);
        self
    }

    pub fn with_goals(mut self, user_id: &str, goals: impl IntoIterator<Item = Goal>) -> Self {
        self.user_mut(user_id).goals.extend(goals);
        self
    }

    pub fn with_user_name(mut self, user_id: &str, name: impl Into<String>) -> Self {
        self.set_user_name(user_id, name);
        self
    }
}

impl RecordStore for MemoryStore {
    async fn fetch_transactions(&self, user_id: &str, year: i32) -> Result<Vec<Transaction>> {
        Ok(self
            .users
            .get(user_id)
            .map(|u| {
                u.transactions
                    .iter()
                    .filter(|t| t.in_year(year))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_salaries(&self, user_id: &str, year: i32) -> Result<Vec<SalaryRecord>> {
        Ok(self
            .users
            .get(user_id)
            .map(|u| {
                u.salaries
                    .iter()
                    .filter(|s| s.in_year(year))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        Ok(self
            .users
            .get(user_id)
            .map(|u| u.goals.clone())
            .unwrap_or_default())
    }

    async fn fetch_user_name(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self.users.get(user_id).and_then(|u| u.name.clone()))
    }
}
