//! Budget CLI commands
//!
//! Monthly budget management and the budget-versus-spending view.

use clap::Subcommand;

use super::filter::parse_month;
use crate::config::settings::Settings;
use crate::display::budget::{format_budget_details, format_budget_list, format_budget_status};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetId, BudgetPatch, OwnerId, RawBudget, YearMonth};
use crate::services::LedgerService;
use crate::storage::EntryStore;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set a spending ceiling for a month
    Add {
        /// Budget amount
        amount: String,
        /// Budget month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Title; defaults to "Budget YYYY-MM"
        #[arg(short, long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Edit a budget
    Edit {
        /// Budget ID
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        /// Move the budget to another month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a budget
    #[command(alias = "delete")]
    Remove {
        /// Budget ID
        id: String,
    },
    /// List budgets, newest month first
    List {
        /// Only budgets for this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Compare a month's budget with its spending
    Status {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
}

fn parse_budget_id(id: &str) -> LedgerResult<BudgetId> {
    id.parse()
        .map_err(|_| LedgerError::Validation(format!("Invalid budget ID: '{}'", id)))
}

fn month_or_current(month: Option<&str>) -> LedgerResult<YearMonth> {
    month.map_or_else(|| Ok(YearMonth::current()), parse_month)
}

/// Handle a budget command
pub fn handle_budget_command<S: EntryStore>(
    service: &LedgerService<S>,
    settings: &Settings,
    owner: &OwnerId,
    cmd: BudgetCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();
    let budgets = service.budgets();

    match cmd {
        BudgetCommands::Add {
            amount,
            month,
            title,
            description,
        } => {
            let period = month_or_current(month.as_deref())?;
            let raw = RawBudget {
                title,
                description,
                ..RawBudget::new(period, amount)
            };

            let budget = budgets.create(owner, raw)?;
            println!(
                "Set budget of {} for {}",
                budget.amount.format_with_symbol(symbol),
                budget.period
            );
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::Edit {
            id,
            amount,
            month,
            title,
            description,
        } => {
            let period = month.as_deref().map(parse_month).transpose()?;
            let patch = BudgetPatch {
                title,
                description,
                month: period.map(|p| p.month()),
                year: period.map(|p| p.year()),
                amount,
            };
            if patch.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let budget = budgets.update(owner, parse_budget_id(&id)?, patch)?;
            println!("Updated budget {}", budget.id);
            print!("{}", format_budget_details(&budget, symbol));
        }

        BudgetCommands::Remove { id } => {
            let budget = budgets.remove(owner, parse_budget_id(&id)?)?;
            println!("Removed budget {} ({})", budget.id, budget.period);
        }

        BudgetCommands::List { month } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            let listed = service.list_budgets(owner, month)?;
            print!("{}", format_budget_list(&listed, symbol));
        }

        BudgetCommands::Status { month } => {
            let month = month_or_current(month.as_deref())?;
            let status = service.get_budget_status(owner, month)?;
            print!("{}", format_budget_status(&status, symbol));
        }
    }

    Ok(())
}
