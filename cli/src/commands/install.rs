//! Install command: create every configured link.
use anyhow::Result;

use crate::cli::{GlobalOpts, LinkOpts};
use crate::logging::{Log, Logger};
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::tasks::{LinkSet, Reconciler, RunReport};

use super::{CommandSetup, finish_run, render_run};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or expanded, if
/// any link failed, or if the run stopped on an I/O error.
pub fn run(global: &GlobalOpts, opts: &LinkOpts, log: &Logger) -> Result<()> {
    let fs = SystemFileSystemOps;
    let setup = CommandSetup::init(global, "install", &fs, log)?;
    let links = setup.links(&fs, log)?;
    let report = execute(&setup, &links, opts, &fs, log)?;
    finish_run(&report, log)
}

/// Reconcile every link toward its managed state and render the result.
///
/// # Errors
///
/// Returns an error if the backup directory cannot be resolved.  Per-link
/// failures are carried in the returned report.
pub fn execute(
    setup: &CommandSetup,
    links: &LinkSet,
    opts: &LinkOpts,
    fs: &dyn FileSystemOps,
    log: &dyn Log,
) -> Result<RunReport> {
    let backup = setup.backup_dir(opts)?;
    if opts.no_backup {
        log.info("backups disabled, unmanaged entries are left in place");
    } else {
        log.info(&format!("backup path: {}", backup.path().display()));
    }
    if opts.dry_run {
        log.dry_run("no changes will be made");
    }

    let specs = links.to_vec();
    let report = Reconciler::new(fs, &specs).install(&backup, opts.dry_run, opts.no_backup);
    render_run(links, &report, log);
    Ok(report)
}
