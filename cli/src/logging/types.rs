//! Core logging types: per-link entries, their status, and the [`Log`] trait.

/// One link's result, kept for the run summary.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    /// The link path, as displayed.
    pub link: String,
    /// Final status of the entry.
    pub status: EntryStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Summary status of one link after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// The link is (now) managed.
    Ok,
    /// Nothing was done for this link.
    Skipped,
    /// Dry run; the change was only reported.
    DryRun,
    /// The link could not be processed or is not managed.
    Failed,
}

/// Abstraction over logging backends.
///
/// Command code logs through this trait so tests can substitute a recorder
/// for the console [`Logger`](super::logger::Logger).
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a link result for the summary.
    fn record_entry(&self, link: &str, status: EntryStatus, message: Option<&str>);
}
