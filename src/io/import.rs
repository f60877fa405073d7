use anyhow::Result;
use std::io::Read;
use tracing::{debug, warn};

use crate::application::WrappedService;
use crate::domain::{Cents, TransactionKind, parse_cents};
use crate::storage::Repository;

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred on one line of an import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate every line without writing anything
    pub dry_run: bool,
}

/// Importer for loading one user's records from CSV
pub struct Importer<'a> {
    service: &'a WrappedService<Repository>,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a WrappedService<Repository>) -> Self {
        Self { service }
    }

    /// Import transactions from CSV with columns
    /// `date,type,amount,category,description` (header row required).
    pub async fn import_transactions_csv<R: Read>(
        &self,
        reader: R,
        user_id: &str,
        options: &ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut result = ImportResult::default();

        for (line_num, record) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    result.push_error(line, None, format!("CSV parse error: {}", e));
                    continue;
                }
            };

            let date = non_empty(record.get(0));
            let kind_str = record.get(1).unwrap_or("");
            let amount_str = record.get(2).unwrap_or("");
            let category = non_empty(record.get(3));
            let description = non_empty(record.get(4));

            let Some(kind) = TransactionKind::from_str(kind_str) else {
                result.push_error(
                    line,
                    Some("type"),
                    format!("Unknown type '{}', expected credit or debit", kind_str),
                );
                continue;
            };

            let amount_cents = match parse_amount(amount_str) {
                Ok(a) => a,
                Err(e) => {
                    result.push_error(line, Some("amount"), e);
                    continue;
                }
            };

            if options.dry_run {
                result.imported += 1;
                continue;
            }

            match self
                .service
                .record_transaction(user_id, kind, amount_cents, date, category, description)
                .await
            {
                Ok(_) => result.imported += 1,
                Err(e) => {
                    result.push_error(line, None, format!("Transaction creation failed: {}", e))
                }
            }
        }

        debug!(user_id, imported = result.imported, "Imported transactions");
        Ok(result)
    }

    /// Import salaries from CSV with columns `month,amount` (header row required).
    /// A month that already has a salary gets its amount replaced.
    pub async fn import_salaries_csv<R: Read>(
        &self,
        reader: R,
        user_id: &str,
        options: &ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut result = ImportResult::default();

        for (line_num, record) in csv_reader.records().enumerate() {
            let line = line_num + 2;

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    result.push_error(line, None, format!("CSV parse error: {}", e));
                    continue;
                }
            };

            let Some(month) = non_empty(record.get(0)) else {
                result.push_error(line, Some("month"), "Missing month".to_string());
                continue;
            };

            let amount_cents = match parse_amount(record.get(1).unwrap_or("")) {
                Ok(a) => a,
                Err(e) => {
                    result.push_error(line, Some("amount"), e);
                    continue;
                }
            };

            if options.dry_run {
                result.imported += 1;
                continue;
            }

            match self
                .service
                .record_salary(user_id, month, amount_cents)
                .await
            {
                Ok(_) => result.imported += 1,
                Err(e) => result.push_error(line, None, format!("Salary creation failed: {}", e)),
            }
        }

        debug!(user_id, imported = result.imported, "Imported salaries");
        Ok(result)
    }
}

impl ImportResult {
    fn push_error(&mut self, line: usize, field: Option<&str>, error: String) {
        warn!(line, field, %error, "Skipping import line");
        self.errors.push(ImportError {
            line,
            field: field.map(str::to_string),
            error,
        });
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_amount(input: &str) -> std::result::Result<Cents, String> {
    let cents = parse_cents(input).map_err(|e| format!("Invalid amount '{}': {}", input, e))?;
    if cents < 0 {
        return Err(format!("Amount must not be negative: {}", input));
    }
    Ok(cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  food ")), Some("food".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50"), Ok(1250));
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.5€").is_err());
    }
}
