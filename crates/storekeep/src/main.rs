//! storekeep CLI - backup and restore for the storefront collections
//!
//! This is the main entry point for the storekeep command-line interface.

mod cli;
mod commands;
mod output;

use clap::Parser;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let global = commands::GlobalOptions {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    match cli.command {
        Commands::Create(args) => commands::create::run(args, &global).await,
        Commands::Restore(args) => commands::restore::run(args, &global).await,
        Commands::List(args) => commands::list::run(args, &global).await,
        Commands::Clean(args) => commands::clean::run(args, &global).await,
        Commands::Auto(args) => commands::auto::run(args, &global).await,
        Commands::Schedule(args) => commands::schedule::run(args, &global).await,
        Commands::Serve(args) => commands::serve::run(args, &global).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(log_layer(std::io::stderr, console::colors_enabled_stderr()))
        .with(filter)
        .init();
}

/// Log lines go to `writer`, never stdout, so `list --json` stays parseable
fn log_layer<S, W>(writer: W, ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
}
