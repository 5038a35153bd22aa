//! Command-line definitions.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "punkt",
    about = "Manage dotfiles as symlinks into a data directory",
    version
)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Config file (default: $PUNKT_CONFIG, then ~/.dotfiles/punkt.toml)
    #[arg(short, long = "config-path", global = true, value_name = "PATH")]
    pub config_path: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report the status of every configured link
    Check,
    /// Create the configured links, backing up whatever is in the way
    Install(LinkOpts),
    /// Remove the managed links
    Uninstall(LinkOpts),
    /// Move a file into the data directory and link it back
    Add(AddOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Install(_) => "install",
            Self::Uninstall(_) => "uninstall",
            Self::Add(_) => "add",
            Self::Version => "version",
        }
    }
}

/// Options for `install` and `uninstall`.
#[derive(Args, Debug, Clone, Default)]
pub struct LinkOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Root directory for this run's backup directory (default: from config)
    #[arg(short, long, value_name = "PATH")]
    pub backup_path: Option<PathBuf>,

    /// Do not back up entries that are moved out of the way
    #[arg(short = 'B', long)]
    pub no_backup: bool,
}

/// Options for the `add` subcommand.
#[derive(Args, Debug, Clone)]
pub struct AddOpts {
    /// File or directory to move into the data directory
    pub path: PathBuf,
}
