//! Check command: report the status of every configured link.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::{EntryStatus, Log, Logger};
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::tasks::{CheckEntry, CheckReport, LinkSet, Reconciler};

use super::{CommandSetup, for_each_grouped};

/// Run the check command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or expanded, or
/// if any link is not managed.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let fs = SystemFileSystemOps;
    let setup = CommandSetup::init(global, "check", &fs, log)?;
    let links = setup.links(&fs, log)?;
    let report = execute(&links, &fs, log);

    log.print_summary();
    let flaws = report.flaws();
    if flaws > 0 {
        anyhow::bail!("{flaws} link(s) not managed");
    }
    Ok(())
}

/// Classify every link and render one line per entry.  Never mutates.
#[must_use]
pub fn execute(links: &LinkSet, fs: &dyn FileSystemOps, log: &dyn Log) -> CheckReport {
    let specs = links.to_vec();
    let report = Reconciler::new(fs, &specs).check();
    for_each_grouped(links, &report.entries, log, |entry| render_entry(entry, log));
    report
}

fn render_entry(entry: &CheckEntry, log: &dyn Log) {
    let link = entry.spec.link.display().to_string();
    match &entry.status {
        Ok(status) => {
            log.info(&format!("check: {link} -- {status}"));
            let summary = if status.is_managed() {
                EntryStatus::Ok
            } else {
                EntryStatus::Failed
            };
            log.record_entry(&link, summary, Some(status.label()));
        }
        Err(err) => {
            log.error(&format!("check: {link} -- {err}"));
            log.record_entry(&link, EntryStatus::Failed, Some(&err.to_string()));
        }
    }
}
