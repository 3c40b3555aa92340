//! Auto command

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use storekeep_backup::human_bytes;

use super::{CommandContext, GlobalOptions};
use crate::output;

#[derive(Args, Debug)]
pub struct AutoArgs {
    /// Number of backups to keep (defaults to the configured keep count)
    pub keep: Option<usize>,

    /// Backup directory (defaults to the configured one)
    #[arg(short, long)]
    pub dir: Option<Utf8PathBuf>,
}

pub async fn run(args: AutoArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let dir = ctx.backup_dir(args.dir.as_deref());
    let keep = args.keep.unwrap_or(ctx.settings.keep_count);

    let created = ctx
        .manager
        .auto_backup(dir, keep)
        .await
        .context("Auto backup failed")?;

    output::success(&format!(
        "Backup created: {} ({})",
        created.path,
        human_bytes(created.size_bytes)
    ));
    output::kv("Retention", &format!("{} most recent", keep));
    Ok(())
}
