use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{WrappedService, WrappedSummary};
use crate::domain::{TransactionKind, WrappedTables, format_cents, parse_cents};
use crate::storage::Repository;

type Service = WrappedService<Repository>;

/// Annum - year-in-review for your personal finance records
#[derive(Parser)]
#[command(name = "annum")]
#[command(about = "Aggregate a year of transactions, salaries and goals into a wrapped summary")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "ANNUM_DB", default_value = "annum.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Transaction commands
    #[command(subcommand)]
    Transaction(TransactionCommands),

    /// Salary commands
    #[command(subcommand)]
    Salary(SalaryCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Import records from CSV
    Import {
        /// What to import
        #[arg(value_enum)]
        import_type: ImportType,

        /// User the records belong to
        #[arg(short, long)]
        user: String,

        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the year-in-review summary for a user
    Wrapped {
        /// User to summarize
        #[arg(short, long)]
        user: String,

        /// Calendar year
        #[arg(short, long)]
        year: i32,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// TOML file overriding category icons and fun comparisons
        #[arg(long, env = "ANNUM_TABLES")]
        tables: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Set the display name shown in summaries
    SetName {
        /// User id
        user: String,

        /// Display name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// User the transaction belongs to
        #[arg(short, long)]
        user: String,

        /// Transaction type
        #[arg(short = 't', long = "type", value_enum)]
        kind: KindArg,

        /// Date (YYYY-MM-DD), stored as given
        #[arg(long)]
        date: Option<String>,

        /// Category (e.g., "food", "rent")
        #[arg(short, long)]
        category: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SalaryCommands {
    /// Set the salary for a month (replaces an existing one)
    Set {
        /// Amount (e.g., "50000")
        amount: String,

        /// User the salary belongs to
        #[arg(short, long)]
        user: String,

        /// Month (YYYY-MM)
        #[arg(short, long)]
        month: String,
    },
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a savings goal
    Add {
        /// User the goal belongs to
        #[arg(short, long)]
        user: String,

        /// Target amount
        #[arg(short, long)]
        target: String,

        /// Amount saved so far
        #[arg(short, long, default_value = "0")]
        current: String,

        /// Goal name
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ImportType {
    Transactions,
    Salaries,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Credit,
    Debit,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Credit => TransactionKind::Credit,
            KindArg::Debit => TransactionKind::Debit,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                Service::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::User(UserCommands::SetName { user, name }) => {
                let service = Service::connect(&self.database).await?;
                service.set_user_name(&user, &name).await?;
                println!("User {} is now shown as '{}'", user, name);
            }

            Commands::Transaction(TransactionCommands::Add {
                amount,
                user,
                kind,
                date,
                category,
                description,
            }) => {
                let service = Service::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                let txn = service
                    .record_transaction(
                        &user,
                        kind.into(),
                        amount_cents,
                        date,
                        category,
                        description,
                    )
                    .await?;

                println!(
                    "Recorded {}: {} {} on {} ({})",
                    txn.kind.as_deref().unwrap_or(""),
                    format_cents(txn.amount()),
                    txn.category(),
                    if txn.date().is_empty() { "-" } else { txn.date() },
                    txn.id
                );
            }

            Commands::Salary(SalaryCommands::Set {
                amount,
                user,
                month,
            }) => {
                let service = Service::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                let salary = service.record_salary(&user, month, amount_cents).await?;
                println!(
                    "Salary for {}: {}",
                    salary.month(),
                    format_cents(salary.amount())
                );
            }

            Commands::Goal(GoalCommands::Add {
                user,
                target,
                current,
                name,
            }) => {
                let service = Service::connect(&self.database).await?;
                let target_cents = parse_cents(&target).context("Invalid target amount")?;
                let current_cents = parse_cents(&current).context("Invalid current amount")?;

                let goal = service
                    .record_goal(&user, name, target_cents, current_cents)
                    .await?;
                println!(
                    "Added goal {}: {} of {} ({})",
                    goal.name.as_deref().unwrap_or("(unnamed)"),
                    format_cents(goal.current()),
                    format_cents(goal.target()),
                    goal.id
                );
            }

            Commands::Import {
                import_type,
                user,
                input,
                dry_run,
            } => {
                let service = Service::connect(&self.database).await?;
                run_import_command(&service, import_type, &user, input, dry_run).await?;
            }

            Commands::Wrapped {
                user,
                year,
                format,
                tables,
            } => {
                let mut service = Service::connect(&self.database).await?;
                if let Some(path) = tables {
                    service = service.with_tables(load_tables(&path)?);
                }

                let summary = service.get_wrapped_summary(&user, year).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    }
                    OutputFormat::Table => print_summary(&summary),
                }
            }
        }

        Ok(())
    }
}

fn load_tables(path: &Path) -> Result<WrappedTables> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tables file {}", path.display()))?;
    WrappedTables::from_toml_str(&content)
        .with_context(|| format!("Invalid tables file {}", path.display()))
}

async fn run_import_command(
    service: &Service,
    import_type: ImportType,
    user: &str,
    input: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{Read, stdin};

    let reader: Box<dyn Read> = match &input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Box::new(stdin()),
    };

    let importer = Importer::new(service);
    let options = ImportOptions { dry_run };
    let result = match import_type {
        ImportType::Transactions => {
            importer
                .import_transactions_csv(reader, user, &options)
                .await?
        }
        ImportType::Salaries => importer.import_salaries_csv(reader, user, &options).await?,
    };

    if dry_run {
        println!("Dry run: {} record(s) would be imported", result.imported);
    } else {
        println!("Imported {} record(s)", result.imported);
    }

    if !result.errors.is_empty() {
        eprintln!("{} line(s) skipped:", result.errors.len());
        for err in &result.errors {
            match &err.field {
                Some(field) => eprintln!("  line {} [{}]: {}", err.line, field, err.error),
                None => eprintln!("  line {}: {}", err.line, err.error),
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &WrappedSummary) {
    println!("{} Wrapped - {}", summary.year, summary.user_name);
    println!("{}", "=".repeat(44));
    println!("{:<24} {:>18}", "Income", format_cents(summary.total_income));
    println!("{:<24} {:>18}", "Expenses", format_cents(summary.total_expenses));
    println!("{:<24} {:>18}", "Savings", format_cents(summary.total_savings));
    println!("{:<24} {:>18}", "Transactions", summary.total_transactions);
    println!(
        "{:<24} {:>18}",
        "Avg monthly spending",
        format_cents(summary.average_monthly_spending)
    );
    println!(
        "{:<24} {:>18}",
        "Daily average",
        format_cents(summary.daily_average_spend)
    );
    println!(
        "{:<24} {:>18.1}",
        "Transactions / month", summary.transactions_per_month
    );
    println!();

    if !summary.top_categories.is_empty() {
        println!("Top categories");
        for (i, cat) in summary.top_categories.iter().enumerate() {
            println!(
                "  {}. {} {:<16} {:>12} ({:.1}%)",
                i + 1,
                cat.icon,
                truncate(&cat.category, 16),
                format_cents(cat.amount),
                cat.percentage
            );
        }
        println!();
    }

    println!("Most consistent:   {}", summary.most_consistent_category);
    if let Some(biggest) = &summary.biggest_transaction {
        println!(
            "Biggest spend:     {} on {} ({}) {}",
            format_cents(biggest.amount),
            biggest.date,
            biggest.category,
            biggest.description
        );
    }
    println!("Top spending day:  {}", summary.top_spending_day_of_week);
    println!("Highest spending:  {}", summary.highest_spending_month);
    println!("Best savings:      {}", summary.most_savings_month);
    println!();

    if !summary.monthly_data.is_empty() {
        println!(
            "{:<10} {:>12} {:>12} {:>12}",
            "MONTH", "INCOME", "EXPENSES", "SAVINGS"
        );
        println!("{}", "-".repeat(49));
        for month in &summary.monthly_data {
            println!(
                "{:<10} {:>12} {:>12} {:>12}",
                month.month,
                format_cents(month.income),
                format_cents(month.expenses),
                format_cents(month.savings)
            );
        }
        println!();
    }

    let goals = &summary.goals_summary;
    println!(
        "Goals: {} total, {} completed, {} missed ({} of {} saved)",
        goals.total_goals,
        goals.completed,
        goals.missed,
        format_cents(goals.total_saved),
        format_cents(goals.total_target)
    );

    for line in &summary.fun_comparisons {
        println!("  * {}", line);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
