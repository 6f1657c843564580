use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ledgerview::cli::{
    handle_budget_command, handle_entry_command, handle_export_command, handle_report_command,
    BudgetCommands, EntryCommands, ExportArgs, ReportCommands,
};
use ledgerview::config::{paths::LedgerPaths, settings::Settings};
use ledgerview::models::OwnerId;
use ledgerview::services::LedgerService;
use ledgerview::storage::JsonStore;
use ledgerview::LedgerError;

#[derive(Parser)]
#[command(
    name = "ledgerview",
    version,
    about = "Personal income and expense ledger with reports and CSV export",
    long_about = "ledgerview records income and expense entries and turns them into \
                  consistent views: totals, per-category sums, monthly trends, savings \
                  rate, budget comparison and a canonical CSV export."
)]
struct Cli {
    /// Owner whose ledger to use; defaults to the configured default owner
    #[arg(long, global = true, env = "LEDGERVIEW_OWNER")]
    owner: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Income and expense entries
    #[command(subcommand)]
    Entry(EntryCommands),

    /// Monthly budgets
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Summaries, breakdowns and trends
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export entries as CSV
    Export(ExportArgs),

    /// Write default settings, optionally recording a default owner
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stderr keeps `export --stdout` output clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_owner(flag: Option<String>, settings: &Settings) -> Result<OwnerId, LedgerError> {
    flag.map(OwnerId::new)
        .filter(|owner| !owner.as_str().is_empty())
        .or_else(|| settings.owner())
        .ok_or_else(|| {
            LedgerError::Config(
                "no owner given; pass --owner or set default_owner with 'ledgerview init --owner <id>'"
                    .into(),
            )
        })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("ledgerview - income, expenses and where they went");
            println!();
            println!("Run 'ledgerview --help' for usage information.");
            return Ok(());
        }
    };

    match command {
        Commands::Init => {
            if let Some(owner) = cli.owner.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
                settings.default_owner = Some(owner.to_string());
            }
            settings.save(&paths)?;
            JsonStore::open(paths.clone()).context("Failed to initialize data directory")?;

            println!("Initialized ledgerview at: {}", paths.base_dir().display());
            if let Some(owner) = settings.owner() {
                println!("Default owner: {}", owner);
            }
        }
        Commands::Config => {
            println!("ledgerview Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", settings.export_dir(&paths).display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!(
                "  Default owner:     {}",
                settings.owner().map_or_else(|| "(none)".to_string(), |o| o.to_string())
            );
            println!("  Snapshot attempts: {}", settings.snapshot_attempts);
            println!("  Log filter:        {}", settings.log_filter);
        }
        command => {
            let owner = resolve_owner(cli.owner, &settings)?;
            let store = JsonStore::open(paths.clone())?;
            let service =
                LedgerService::new(store).with_snapshot_attempts(settings.snapshot_attempts);

            match command {
                Commands::Entry(cmd) => handle_entry_command(&service, &settings, &owner, cmd)?,
                Commands::Budget(cmd) => handle_budget_command(&service, &settings, &owner, cmd)?,
                Commands::Report(cmd) => handle_report_command(&service, &settings, &owner, cmd)?,
                Commands::Export(args) => {
                    handle_export_command(&service, &paths, &settings, &owner, args)?
                }
                Commands::Init | Commands::Config => {}
            }
        }
    }

    Ok(())
}
