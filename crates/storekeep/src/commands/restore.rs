//! Restore command

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Args;

use super::{print_collection_counts, CommandContext, GlobalOptions};
use crate::output;

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Backup file to restore
    pub file: Utf8PathBuf,

    /// Empty every collection before inserting
    #[arg(long)]
    pub clear: bool,
}

pub async fn run(args: RestoreArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::load(global)?;

    output::header("Restore Backup");
    output::kv("File", args.file.as_str());
    output::kv("Data store", ctx.settings.data_dir.as_str());
    if args.clear {
        output::warning("Existing records will be deleted before restoring");
    }

    let summary = ctx
        .manager
        .restore_backup(&args.file, args.clear)
        .await
        .with_context(|| format!("Failed to restore {}", args.file))?;

    output::success(&format!(
        "Backup restored: {} records inserted",
        summary.total()
    ));
    print_collection_counts(&summary.inserted);
    Ok(())
}
