//! Schedule command

use anyhow::Result;
use clap::Args;
use storekeep_backup::DailyScheduler;

use super::{shutdown_signal, CommandContext, GlobalOptions};
use crate::output;

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Local hour of day (0-23) of the daily backup
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,

    /// Number of backups kept by each run
    #[arg(long)]
    pub keep: Option<usize>,
}

pub async fn run(args: ScheduleArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let hour = args.hour.unwrap_or(ctx.settings.backup_hour);
    let keep = args.keep.unwrap_or(ctx.settings.scheduled_keep_count);

    output::header("Daily Backup Schedule");
    output::kv("Time", &format!("{:02}:00 local", hour));
    output::kv("Directory", ctx.settings.backup_dir.as_str());
    output::kv("Retention", &format!("{} most recent", keep));
    output::info("Press Ctrl-C to stop");

    let scheduler = DailyScheduler::new(
        ctx.manager.clone(),
        ctx.settings.backup_dir.clone(),
        hour,
        keep,
    );
    scheduler.run_until(shutdown_signal()).await;
    Ok(())
}
