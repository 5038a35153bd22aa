//! Add command: fold an existing file into the data directory.
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::{AddOpts, GlobalOpts};
use crate::logging::{EntryStatus, Log, Logger};
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::tasks::{AddOperation, Added};

use super::CommandSetup;

/// Run the add command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, a precondition
/// fails, or the move or link step fails.
pub fn run(global: &GlobalOpts, opts: &AddOpts, log: &Logger) -> Result<()> {
    let fs = SystemFileSystemOps;
    let setup = CommandSetup::init(global, "add", &fs, log)?;
    let path = std::path::absolute(&opts.path)
        .with_context(|| format!("resolving {}", opts.path.display()))?;
    let result = execute(&setup, &path, &fs, log);
    log.print_summary();
    result.map(|_| ())
}

/// Move `path` into the data directory and link it back.
///
/// # Errors
///
/// Returns the [`AddError`](crate::error::AddError) that stopped the
/// operation, after logging it.
pub fn execute(
    setup: &CommandSetup,
    path: &Path,
    fs: &dyn FileSystemOps,
    log: &dyn Log,
) -> Result<Added> {
    let link = path.display().to_string();
    match AddOperation::from_config(fs, &setup.config).add(path) {
        Ok(added) => {
            log.info(&format!(
                "moved: {} => {}",
                added.link.display(),
                added.target.display()
            ));
            log.info(&format!(
                "link created: {} => {}",
                added.link.display(),
                added.target.display()
            ));
            log.record_entry(&link, EntryStatus::Ok, Some("added"));
            Ok(added)
        }
        Err(err) => {
            log.error(&format!("add {link}: {err}"));
            log.record_entry(&link, EntryStatus::Failed, Some(&err.to_string()));
            Err(err.into())
        }
    }
}
