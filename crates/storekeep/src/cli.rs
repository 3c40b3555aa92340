//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

pub use crate::commands::auto::AutoArgs;
pub use crate::commands::clean::CleanArgs;
pub use crate::commands::create::CreateArgs;
pub use crate::commands::list::ListArgs;
pub use crate::commands::restore::RestoreArgs;
pub use crate::commands::schedule::ScheduleArgs;
pub use crate::commands::serve::ServeArgs;

/// storekeep - Backup and restore for the storefront collections
#[derive(Parser, Debug)]
#[command(name = "storekeep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a storekeep.yaml settings file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Directory of the JSON document store
    #[arg(long, global = true)]
    pub data_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a backup of all collections
    Create(CreateArgs),

    /// Restore collections from a backup file
    Restore(RestoreArgs),

    /// List available backups
    List(ListArgs),

    /// Delete old backups, keeping the most recent ones
    Clean(CleanArgs),

    /// Create a backup, then delete old ones
    Auto(AutoArgs),

    /// Run the daily auto-backup until interrupted
    Schedule(ScheduleArgs),

    /// Serve the admin backup API
    Serve(ServeArgs),
}
