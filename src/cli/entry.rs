//! Entry CLI commands
//!
//! Implements CLI commands for recording and browsing income and expenses.

use clap::Subcommand;

use super::filter::FilterArgs;
use crate::config::settings::Settings;
use crate::display::entry::{format_entry_details, format_entry_register};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{EntryId, EntryKind, EntryPatch, OwnerId, RawEntry, DATE_FORMAT};
use crate::reports::SortOrder;
use crate::services::LedgerService;
use crate::storage::EntryStore;

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Record income or an expense
    Add {
        /// Entry type: income or expense
        kind: String,
        /// Amount, e.g. "1500" or "12.50"
        amount: String,
        /// Category; defaults to the entry type
        #[arg(short, long)]
        category: Option<String>,
        /// Short title
        #[arg(short, long)]
        title: Option<String>,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List entries, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Show the oldest entries first
        #[arg(long)]
        oldest_first: bool,
        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show entry details
    Show {
        /// Entry ID
        id: String,
    },
    /// Edit an entry; the type cannot change
    Edit {
        /// Entry ID
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        /// New category; an empty value resets it to the entry type
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Remove an entry
    #[command(alias = "delete")]
    Remove {
        /// Entry ID
        id: String,
    },
    /// List the categories in use
    Categories,
}

pub(crate) fn parse_entry_id(id: &str) -> LedgerResult<EntryId> {
    id.parse()
        .map_err(|_| LedgerError::Validation(format!("Invalid entry ID: '{}'", id)))
}

/// Handle an entry command
pub fn handle_entry_command<S: EntryStore>(
    service: &LedgerService<S>,
    settings: &Settings,
    owner: &OwnerId,
    cmd: EntryCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();
    let entries = service.entries();

    match cmd {
        EntryCommands::Add {
            kind,
            amount,
            category,
            title,
            description,
            date,
        } => {
            let kind: EntryKind = kind.parse()?;
            let date = date.unwrap_or_else(|| {
                chrono::Local::now()
                    .date_naive()
                    .format(DATE_FORMAT)
                    .to_string()
            });

            let raw = RawEntry {
                kind: Some(kind.as_str().to_string()),
                amount: Some(amount),
                category,
                title,
                description,
                date: Some(date),
            };

            let entry = entries.create(owner, raw)?;
            println!("Recorded {} of {}", entry.kind.as_str(), entry.amount.format_with_symbol(symbol));
            println!("  Category: {}", entry.category);
            println!("  ID: {}", entry.id);
        }

        EntryCommands::List {
            filter,
            oldest_first,
            limit,
        } => {
            let spec = filter.to_spec()?;
            let order = if oldest_first {
                SortOrder::OldestFirst
            } else {
                SortOrder::NewestFirst
            };

            let mut history = service.get_history(owner, &spec, order)?;
            if let Some(limit) = limit {
                history.truncate(limit);
            }
            print!("{}", format_entry_register(&history, symbol));
        }

        EntryCommands::Show { id } => {
            let entry = entries.get(owner, parse_entry_id(&id)?)?;
            print!("{}", format_entry_details(&entry, symbol));
        }

        EntryCommands::Edit {
            id,
            amount,
            category,
            title,
            description,
            date,
        } => {
            let patch = EntryPatch {
                kind: None,
                amount,
                category,
                title,
                description,
                date,
            };
            if patch.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let entry = entries.update(owner, parse_entry_id(&id)?, patch)?;
            println!("Updated entry {}", entry.id);
            print!("{}", format_entry_details(&entry, symbol));
        }

        EntryCommands::Remove { id } => {
            let entry = entries.remove(owner, parse_entry_id(&id)?)?;
            println!("Removed entry {} ({})", entry.id, entry);
        }

        EntryCommands::Categories => {
            let categories = service.get_categories(owner)?;
            if categories.is_empty() {
                println!("No categories in use.");
            }
            for category in categories {
                println!("{}", category);
            }
        }
    }

    Ok(())
}
