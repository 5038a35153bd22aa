//! Subcommand orchestration: load configuration, drive the link engine,
//! render its reports, and map them to the exit status.
pub mod add;
pub mod check;
pub mod install;
pub mod uninstall;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::{GlobalOpts, LinkOpts};
use crate::config::validation::{ConfigValidator as _, DuplicateLinkValidator, ValidationWarning};
use crate::config::{self, Config};
use crate::logging::{EntryStatus, Log, Logger};
use crate::operations::FileSystemOps;
use crate::resources::backup::BackupDir;
use crate::tasks::{EntryReport, LinkSet, Outcome, RunReport};

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// The loaded configuration.
    pub config: Config,
}

impl CommandSetup {
    /// Resolve the config file from the CLI options and load it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be found or parsed.
    pub fn init(
        global: &GlobalOpts,
        action: &str,
        fs: &dyn FileSystemOps,
        log: &dyn Log,
    ) -> Result<Self> {
        let path = config::resolve_config_path(global.config_path.as_deref())?;
        Self::load(&path, action, fs, log)
    }

    /// Load the config file at `path`, announce the action, and print any
    /// validation warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be found or parsed.
    pub fn load(path: &Path, action: &str, fs: &dyn FileSystemOps, log: &dyn Log) -> Result<Self> {
        let config = Config::load(path)?;
        log.info(&format!("config loaded from: {}", config.path.display()));
        log.info(&format!("action: {action}"));
        log.debug(&format!("data path: {}", config.data_path.display()));
        log.debug(&format!(
            "{} directory pair(s), {} explicit symlink(s)",
            config.directories.len(),
            config.symlinks.len()
        ));

        report_warnings(&config.validate(fs), log);
        Ok(Self { config })
    }

    /// Expand the configuration into the links to reconcile.
    ///
    /// # Errors
    ///
    /// Returns an error if a managed directory does not exist or cannot be
    /// listed.  No filesystem change has been made at that point.
    pub fn links(&self, fs: &dyn FileSystemOps, log: &dyn Log) -> Result<LinkSet> {
        let links = LinkSet::from_config(&self.config, fs)?;
        log.debug(&format!("{} link(s) configured", links.len()));
        report_warnings(&DuplicateLinkValidator::new(&links.to_vec()).validate(fs), log);
        Ok(links)
    }

    /// Backup directory for this run: `--backup-path` if given, else the
    /// configured backup root.
    ///
    /// # Errors
    ///
    /// Returns an error if `--backup-path` starts with `~` and no home
    /// directory is known.
    pub fn backup_dir(&self, opts: &LinkOpts) -> Result<BackupDir> {
        let root: PathBuf = match &opts.backup_path {
            Some(path) => config::paths::expand_cli_path(path)?,
            None => self.config.backup_path.clone(),
        };
        Ok(BackupDir::for_run(&root))
    }
}

fn report_warnings(warnings: &[ValidationWarning], log: &dyn Log) {
    if warnings.is_empty() {
        return;
    }
    log.warn(&format!(
        "found {} configuration warning(s):",
        warnings.len()
    ));
    for warning in warnings {
        log.warn(&format!(
            "  {} [{}]: {}",
            warning.source, warning.item, warning.message
        ));
    }
}

/// Walk `items` alongside the groups of `links`, printing each group's
/// heading before its entries.
///
/// `items` is in link order and may be shorter than `links` when a run
/// stopped early; headings of groups never reached are not printed.
pub(crate) fn for_each_grouped<T>(
    links: &LinkSet,
    items: &[T],
    log: &dyn Log,
    mut render: impl FnMut(&T),
) {
    let mut remaining = items.iter();
    for group in links.groups() {
        if remaining.len() == 0 && !group.links.is_empty() {
            break;
        }
        log.stage(&group.heading());
        for item in remaining.by_ref().take(group.links.len()) {
            render(item);
        }
    }
}

/// Summary status for an install or uninstall outcome.
#[must_use]
pub const fn entry_status(outcome: &Outcome) -> EntryStatus {
    match outcome {
        Outcome::Skipped(_) => EntryStatus::Skipped,
        Outcome::Linked { .. } | Outcome::Removed { .. } => EntryStatus::Ok,
        Outcome::WouldLink { .. } | Outcome::WouldRemove { .. } => EntryStatus::DryRun,
        Outcome::Failed(_) => EntryStatus::Failed,
    }
}

/// Print one line per entry of an install or uninstall run and record each
/// for the summary.
pub fn render_run(links: &LinkSet, report: &RunReport, log: &dyn Log) {
    for_each_grouped(links, &report.entries, log, |entry| render_entry(entry, log));

    if report.aborted {
        log.error(&format!(
            "aborted, {} entries not reached",
            report.unreached
        ));
    }
}

fn render_entry(entry: &EntryReport, log: &dyn Log) {
    let link = entry.spec.link.display().to_string();
    let line = format!(
        "symlink \"{link}\" -> \"{}\"... {}",
        entry.spec.target.display(),
        entry.outcome
    );
    let status = entry_status(&entry.outcome);
    match status {
        EntryStatus::Failed => log.error(&line),
        EntryStatus::DryRun => log.dry_run(&line),
        EntryStatus::Ok | EntryStatus::Skipped => log.info(&line),
    }
    log.record_entry(&link, status, Some(&entry.outcome.to_string()));
}

/// Print the summary and turn a run report into the command result.
///
/// # Errors
///
/// Returns an error if the run stopped early or any entry failed.
pub fn finish_run(report: &RunReport, log: &Logger) -> Result<()> {
    log.print_summary();
    if report.aborted {
        anyhow::bail!(
            "run stopped on an I/O error, {} entries not reached",
            report.unreached
        );
    }
    let failures = report.failures();
    if failures > 0 {
        anyhow::bail!("{failures} link(s) failed");
    }
    Ok(())
}
