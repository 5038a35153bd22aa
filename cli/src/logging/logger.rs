//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{EntryRecord, EntryStatus, Log};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Per-status totals of recorded entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    /// Entries that ended managed.
    pub ok: usize,
    /// Entries left alone.
    pub skipped: usize,
    /// Entries only reported under dry run.
    pub dry_run: usize,
    /// Entries that failed or are not managed.
    pub failed: usize,
}

impl SummaryCounts {
    /// Tally `entries` by status.
    #[must_use]
    pub fn from_entries(entries: &[EntryRecord]) -> Self {
        entries.iter().fold(Self::default(), |mut counts, entry| {
            match entry.status {
                EntryStatus::Ok => counts.ok += 1,
                EntryStatus::Skipped => counts.skipped += 1,
                EntryStatus::DryRun => counts.dry_run += 1,
                EntryStatus::Failed => counts.failed += 1,
            }
            counts
        })
    }

    /// Total number of entries.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.skipped + self.dry_run + self.failed
    }

    /// The plain-text totals line, e.g. `3 links: 2 ok, 1 skipped, 0 dry-run, 0 failed`.
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "{} links: {} ok, {} skipped, {} dry-run, {} failed",
            self.total(),
            self.ok,
            self.skipped,
            self.dry_run,
            self.failed
        )
    }
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Messages go through [`tracing`], so the console and the log file at
/// `$XDG_CACHE_HOME/punkt/<command>.log` see the same stream (see
/// [`init_subscriber`](super::init_subscriber)).
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<EntryRecord>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary; the file
    /// itself is created by the subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<EntryRecord> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a link result for the summary.
    pub fn record_entry(&self, link: &str, status: EntryStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(EntryRecord {
                link: link.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Totals of all recorded entries.
    #[must_use]
    pub fn counts(&self) -> SummaryCounts {
        self.entries
            .lock()
            .map_or_else(|_| SummaryCounts::default(), |g| SummaryCounts::from_entries(&g))
    }

    /// Print the summary of all recorded entries.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        for entry in &entries {
            let (icon, color) = match entry.status {
                EntryStatus::Ok => ("✓", "\x1b[32m"),
                EntryStatus::Skipped => ("○", "\x1b[33m"),
                EntryStatus::DryRun => ("~", "\x1b[37m"),
                EntryStatus::Failed => ("✗", "\x1b[31m"),
            };

            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", entry.link));
        }

        println!();
        let counts = SummaryCounts::from_entries(&entries);
        self.info(&format!(
            "{} links: \x1b[32m{} ok\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[37m{} dry-run\x1b[0m, \x1b[31m{} failed\x1b[0m",
            counts.total(),
            counts.ok,
            counts.skipped,
            counts.dry_run,
            counts.failed
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_entry(&self, link: &str, status: EntryStatus, message: Option<&str>) {
        self.record_entry(link, status, message);
    }
}
