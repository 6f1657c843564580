//! Report CLI commands

use clap::Subcommand;

use super::filter::FilterArgs;
use crate::config::settings::Settings;
use crate::display::report::{
    format_category_breakdown, format_monthly_trend, format_savings_trend, format_summary,
};
use crate::error::LedgerResult;
use crate::models::OwnerId;
use crate::services::LedgerService;
use crate::storage::EntryStore;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, expenses and what remains
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Expenses grouped by category
    Categories {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Income and expenses per month
    Monthly {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Savings rate per month
    Savings {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Handle a report command
pub fn handle_report_command<S: EntryStore>(
    service: &LedgerService<S>,
    settings: &Settings,
    owner: &OwnerId,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Summary { filter } => {
            let summary = service.get_summary(owner, &filter.to_spec()?)?;
            print!("{}", format_summary(&summary, symbol));
        }
        ReportCommands::Categories { filter } => {
            let groups = service.get_category_breakdown(owner, &filter.to_spec()?)?;
            print!("{}", format_category_breakdown(&groups, symbol));
        }
        ReportCommands::Monthly { filter } => {
            let months = service.get_monthly_trend(owner, &filter.to_spec()?)?;
            print!("{}", format_monthly_trend(&months, symbol));
        }
        ReportCommands::Savings { filter } => {
            let rates = service.get_savings_rate_trend(owner, &filter.to_spec()?)?;
            print!("{}", format_savings_trend(&rates));
        }
    }

    Ok(())
}
