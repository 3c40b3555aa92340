//! Serve command

use anyhow::{Context, Result};
use clap::Args;
use storekeep_backup::DailyScheduler;
use storekeep_http::ApiState;
use tokio::net::TcpListener;

use super::{shutdown_signal, CommandContext, GlobalOptions};
use crate::output;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (defaults to the configured one)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Also run the daily auto-backup in this process
    #[arg(long)]
    pub schedule: bool,
}

pub async fn run(args: ServeArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let bind = args.bind.unwrap_or_else(|| ctx.settings.bind.clone());

    if ctx.settings.admin_token.is_none() {
        output::warning("No admin token configured; every backup request will be refused");
    }

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    let state = ApiState::new(
        ctx.manager.clone(),
        ctx.settings.backup_dir.clone(),
        ctx.settings.keep_count,
        ctx.settings.admin_token.clone(),
    );
    let server = storekeep_http::serve(listener, state, shutdown_signal());

    if !args.schedule {
        return server.await.context("HTTP server failed");
    }

    let scheduler = DailyScheduler::new(
        ctx.manager.clone(),
        ctx.settings.backup_dir.clone(),
        ctx.settings.backup_hour,
        ctx.settings.scheduled_keep_count,
    );

    // The scheduler never finishes on its own; the server decides shutdown
    tokio::select! {
        result = server => result.context("HTTP server failed"),
        _ = scheduler.run_until(std::future::pending::<()>()) => Ok(()),
    }
}
