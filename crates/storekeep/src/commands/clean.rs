//! Clean command

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Args;

use super::{CommandContext, GlobalOptions};
use crate::output;

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Number of backups to keep (defaults to the configured keep count)
    pub keep: Option<usize>,

    /// Backup directory (defaults to the configured one)
    #[arg(short, long)]
    pub dir: Option<Utf8PathBuf>,
}

pub async fn run(args: CleanArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let dir = ctx.backup_dir(args.dir.as_deref());
    let keep = args.keep.unwrap_or(ctx.settings.keep_count);

    let deleted = ctx
        .manager
        .clean_old_backups(keep, dir)
        .await
        .with_context(|| format!("Failed to clean backups in {}", dir))?;

    if deleted == 0 {
        output::info(&format!("Nothing to clean, keeping up to {} backups", keep));
    } else {
        output::success(&format!(
            "Removed {} old backup(s), kept the {} most recent",
            deleted, keep
        ));
    }
    Ok(())
}
