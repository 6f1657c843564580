//! Export CLI command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::filter::FilterArgs;
use crate::config::{paths::LedgerPaths, settings::Settings};
use crate::error::{LedgerError, LedgerResult};
use crate::models::OwnerId;
use crate::services::LedgerService;
use crate::storage::EntryStore;

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Print the CSV instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Directory to write into, overriding the configured export directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Render the CSV and write it to a file or stdout
pub fn handle_export_command<S: EntryStore>(
    service: &LedgerService<S>,
    paths: &LedgerPaths,
    settings: &Settings,
    owner: &OwnerId,
    args: ExportArgs,
) -> LedgerResult<()> {
    let spec = args.filter.to_spec()?;
    let export = service.export_csv(owner, &spec)?;

    if args.stdout {
        print!("{}", export.content);
        return Ok(());
    }

    let dir = args.output.unwrap_or_else(|| settings.export_dir(paths));
    std::fs::create_dir_all(&dir).map_err(|e| {
        LedgerError::Io(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let target = dir.join(&export.filename);
    std::fs::write(&target, &export.content)
        .map_err(|e| LedgerError::Io(format!("Failed to write {}: {}", target.display(), e)))?;

    info!(path = %target.display(), "export written");
    println!("Exported to {}", target.display());
    Ok(())
}
