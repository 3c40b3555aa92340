//! Create command

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use storekeep_backup::human_bytes;

use super::{print_collection_counts, CommandContext, GlobalOptions};
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Backup directory (defaults to the configured one)
    #[arg(short, long)]
    pub dir: Option<Utf8PathBuf>,
}

pub async fn run(args: CreateArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let dir = ctx.backup_dir(args.dir.as_deref());

    let created = ctx
        .manager
        .create_backup(dir)
        .await
        .with_context(|| format!("Failed to create backup in {}", dir))?;

    output::success(&format!("Backup created: {}", created.path));
    output::kv("Size", &human_bytes(created.size_bytes));
    output::kv("Database", &created.metadata.database);
    print_collection_counts(&created.metadata.collections);
    Ok(())
}
