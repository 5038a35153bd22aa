//! The `punkt` binary.
use anyhow::Result;
use clap::Parser as _;

use punkt_cli::cli::{Cli, Command};
use punkt_cli::commands;
use punkt_cli::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if matches!(args.command, Command::Version) {
        commands::version::run();
        return Ok(());
    }

    logging::init_subscriber(args.verbose, args.command.name());
    let log = Logger::new(args.command.name());

    match &args.command {
        Command::Check => commands::check::run(&args.global, &log),
        Command::Install(opts) => commands::install::run(&args.global, opts, &log),
        Command::Uninstall(opts) => commands::uninstall::run(&args.global, opts, &log),
        Command::Add(opts) => commands::add::run(&args.global, opts, &log),
        Command::Version => Ok(()),
    }
}
