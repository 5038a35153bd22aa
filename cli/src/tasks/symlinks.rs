//! Reconcile the filesystem against the expanded link set.
//!
//! Each operation walks the links strictly in order, classifies every entry,
//! and branches on its [`LinkStatus`].  Results are returned as structured
//! reports; rendering them is the command layer's job.
use std::fmt;
use std::path::PathBuf;

use crate::operations::FileSystemOps;
use crate::resources::LinkStatus;
use crate::resources::backup::BackupDir;
use crate::resources::error::LinkError;
use crate::resources::symlink::LinkSpec;

/// Why an entry was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Already the managed link.
    Managed,
    /// Nothing exists at the link path.
    DoesNotExist,
    /// Something the tool does not manage occupies the link path.
    Unmanaged,
    /// The link path resolves to the target only through a symlinked parent.
    ManagedByParent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Managed => "managed",
            Self::DoesNotExist => "does not exist",
            Self::Unmanaged => "unmanaged",
            Self::ManagedByParent => "managed through parent",
        })
    }
}

/// What happened to one entry during install or uninstall.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing to do.
    Skipped(SkipReason),
    /// The link was created, after moving any previous occupant to `backup`.
    Linked {
        /// Where the previous occupant was moved, if there was one.
        backup: Option<PathBuf>,
    },
    /// The managed link was removed from its location.
    Removed {
        /// Where the link was moved; `None` when it was deleted outright.
        backup: Option<PathBuf>,
    },
    /// Dry run: the link would be created.
    WouldLink {
        /// Where the previous occupant would be moved, if there is one.
        backup: Option<PathBuf>,
    },
    /// Dry run: the managed link would be removed.
    WouldRemove {
        /// Where the link would be moved; `None` when backups are disabled.
        backup: Option<PathBuf>,
    },
    /// The entry could not be processed.
    Failed(LinkError),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Failed`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns `true` if the filesystem was changed for this entry.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Linked { .. } | Self::Removed { .. })
    }

    /// The backup location this outcome performed, if any.
    #[must_use]
    pub fn performed_backup(&self) -> Option<&PathBuf> {
        match self {
            Self::Linked { backup } | Self::Removed { backup } => backup.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "skip ({reason})"),
            Self::Linked { backup: None } => f.write_str("linked"),
            Self::Linked {
                backup: Some(path),
            } => write!(f, "linked, previous entry backed up to {}", path.display()),
            Self::Removed { backup: None } => f.write_str("removed"),
            Self::Removed {
                backup: Some(path),
            } => write!(f, "moved to {}", path.display()),
            Self::WouldLink { backup: None } => f.write_str("would link"),
            Self::WouldLink {
                backup: Some(path),
            } => write!(f, "would back up to {} and link", path.display()),
            Self::WouldRemove { backup: None } => f.write_str("would remove"),
            Self::WouldRemove {
                backup: Some(path),
            } => write!(f, "would move to {}", path.display()),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Result for one entry of an install or uninstall run.
#[derive(Debug)]
pub struct EntryReport {
    /// The link that was processed.
    pub spec: LinkSpec,
    /// Classification before any change; `None` if it could not be read.
    pub status: Option<LinkStatus>,
    /// What was done.
    pub outcome: Outcome,
}

/// Result of an install or uninstall run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Processed entries, in order.
    pub entries: Vec<EntryReport>,
    /// Entries never reached because the run stopped on an I/O error.
    pub unreached: usize,
    /// Whether the run stopped early.
    pub aborted: bool,
}

impl RunReport {
    /// Number of failed entries.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_failure())
            .count()
    }

    /// Returns `true` if any entry failed or the run stopped early.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.aborted || self.failures() > 0
    }

    /// Number of entries whose filesystem state changed.
    #[must_use]
    pub fn changes(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_change()).count()
    }

    /// Number of backups performed.
    #[must_use]
    pub fn backups(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.performed_backup().is_some())
            .count()
    }
}

/// Classification of one entry by [`Reconciler::check`].
#[derive(Debug)]
pub struct CheckEntry {
    /// The link that was classified.
    pub spec: LinkSpec,
    /// Its status, or the error that prevented classification.
    pub status: Result<LinkStatus, LinkError>,
}

impl CheckEntry {
    /// Returns `true` unless the entry is managed.
    #[must_use]
    pub fn is_flaw(&self) -> bool {
        !matches!(self.status, Ok(LinkStatus::Managed))
    }
}

/// Result of a check run.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Every classified entry, in order.
    pub entries: Vec<CheckEntry>,
}

impl CheckReport {
    /// Number of entries that are not managed.
    #[must_use]
    pub fn flaws(&self) -> usize {
        self.entries.iter().filter(|e| e.is_flaw()).count()
    }

    /// Returns `true` if any entry is not managed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.flaws() > 0
    }
}

/// Drives install, uninstall, and check over an ordered list of links.
///
/// Entries are independent: a recoverable failure on one (collision,
/// missing target, backups disabled) is recorded and the run continues.
/// An unexpected I/O error stops the run; already-processed entries keep
/// their new state and the rest are left untouched.
#[derive(Debug)]
pub struct Reconciler<'a> {
    fs: &'a dyn FileSystemOps,
    links: &'a [LinkSpec],
}

impl<'a> Reconciler<'a> {
    /// Reconcile `links` through `fs`.
    #[must_use]
    pub const fn new(fs: &'a dyn FileSystemOps, links: &'a [LinkSpec]) -> Self {
        Self { fs, links }
    }

    /// Classify every entry.  Never mutates.
    #[must_use]
    pub fn check(&self) -> CheckReport {
        let entries = self
            .links
            .iter()
            .map(|spec| {
                let status = spec
                    .status(self.fs)
                    .map_err(|source| LinkError::io(&spec.link, source));
                tracing::debug!("check {}: {status:?}", spec.link.display());
                CheckEntry {
                    spec: spec.clone(),
                    status,
                }
            })
            .collect();
        CheckReport { entries }
    }

    /// Drive every entry toward [`LinkStatus::Managed`].
    ///
    /// Per entry, an existing occupant is always moved into `backup` before
    /// the link is created.  With `skip_backup` an unmanaged occupant is
    /// left in place and the entry fails with [`LinkError::BackupDisabled`].
    /// The link's parent directory must already exist.
    #[must_use]
    pub fn install(&self, backup: &BackupDir, dry_run: bool, skip_backup: bool) -> RunReport {
        self.run(|spec, status| self.install_entry(spec, status, backup, dry_run, skip_backup))
    }

    /// Remove every managed link from its location.
    ///
    /// Missing and unmanaged entries are never touched.  The link object is
    /// moved into `backup` (or deleted with `skip_backup`); its target is
    /// never followed.
    #[must_use]
    pub fn uninstall(&self, backup: &BackupDir, dry_run: bool, skip_backup: bool) -> RunReport {
        self.run(|spec, status| self.uninstall_entry(spec, status, backup, dry_run, skip_backup))
    }

    fn run<F>(&self, mut apply: F) -> RunReport
    where
        F: FnMut(&LinkSpec, LinkStatus) -> Outcome,
    {
        let mut report = RunReport::default();

        for (index, spec) in self.links.iter().enumerate() {
            let (status, outcome) = match spec.status(self.fs) {
                Ok(status) => (Some(status), apply(spec, status)),
                Err(source) => (None, Outcome::Failed(LinkError::io(&spec.link, source))),
            };

            let fatal = matches!(&outcome, Outcome::Failed(err) if err.is_fatal());
            report.entries.push(EntryReport {
                spec: spec.clone(),
                status,
                outcome,
            });

            if fatal {
                report.aborted = true;
                report.unreached = self.links.len() - index - 1;
                tracing::debug!("run stopped, {} entries not reached", report.unreached);
                break;
            }
        }

        report
    }

    fn install_entry(
        &self,
        spec: &LinkSpec,
        status: LinkStatus,
        backup_dir: &BackupDir,
        dry_run: bool,
        skip_backup: bool,
    ) -> Outcome {
        if status == LinkStatus::Managed {
            tracing::debug!("ok: {} (already linked)", spec.link.display());
            return Outcome::Skipped(SkipReason::Managed);
        }

        if !self.fs.exists(&spec.target) {
            return Outcome::Failed(LinkError::TargetMissing {
                target: spec.target.clone(),
            });
        }

        let needs_backup = status == LinkStatus::Unmanaged;
        if needs_backup && skip_backup {
            return Outcome::Failed(LinkError::BackupDisabled {
                link: spec.link.clone(),
            });
        }

        if dry_run {
            let backup = if needs_backup {
                match backup_dir.destination_for(&spec.link) {
                    Ok(dest) => Some(dest),
                    Err(err) => return Outcome::Failed(err),
                }
            } else {
                None
            };
            return Outcome::WouldLink { backup };
        }

        let backup = if needs_backup {
            match backup_dir.backup(self.fs, &spec.link) {
                Ok(dest) => Some(dest),
                Err(err) => return Outcome::Failed(err),
            }
        } else {
            None
        };

        if let Err(err) = self.create_link(spec) {
            return Outcome::Failed(err);
        }
        tracing::debug!("linked {}", spec.description());
        Outcome::Linked { backup }
    }

    fn create_link(&self, spec: &LinkSpec) -> Result<(), LinkError> {
        self.fs
            .symlink(&spec.target, &spec.link)
            .map_err(|source| LinkError::io(&spec.link, source))
    }

    fn uninstall_entry(
        &self,
        spec: &LinkSpec,
        status: LinkStatus,
        backup_dir: &BackupDir,
        dry_run: bool,
        skip_backup: bool,
    ) -> Outcome {
        match status {
            LinkStatus::Missing => return Outcome::Skipped(SkipReason::DoesNotExist),
            LinkStatus::Unmanaged => return Outcome::Skipped(SkipReason::Unmanaged),
            LinkStatus::Managed => {}
        }

        // Resolving through a symlinked ancestor means the path is the data
        // content itself; moving it would move the managed file.
        if !self.fs.is_symlink(&spec.link) {
            tracing::debug!(
                "{} is managed through a parent link, leaving it",
                spec.link.display()
            );
            return Outcome::Skipped(SkipReason::ManagedByParent);
        }

        if dry_run {
            let backup = if skip_backup {
                None
            } else {
                match backup_dir.destination_for(&spec.link) {
                    Ok(dest) => Some(dest),
                    Err(err) => return Outcome::Failed(err),
                }
            };
            return Outcome::WouldRemove { backup };
        }

        if skip_backup {
            return match self.fs.remove_link(&spec.link) {
                Ok(()) => {
                    tracing::debug!("removed {}", spec.link.display());
                    Outcome::Removed { backup: None }
                }
                Err(source) => Outcome::Failed(LinkError::io(&spec.link, source)),
            };
        }

        match backup_dir.backup(self.fs, &spec.link) {
            Ok(dest) => Outcome::Removed { backup: Some(dest) },
            Err(err) => Outcome::Failed(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::{EntryKind, MockFileSystemOps};
    use std::path::Path;

    fn backup_dir() -> BackupDir {
        let started = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        BackupDir::new(Path::new("/backups"), started)
    }

    const BACKUP: &str = "/backups/backup2024-05-03_14-07-09";

    fn foo() -> LinkSpec {
        LinkSpec::new("/data/home/.foo", "/home/me/.foo")
    }

    // -----------------------------------------------------------------------
    // check
    // -----------------------------------------------------------------------

    #[test]
    fn check_reports_each_status() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.a")
            .with_file("/data/home/.b")
            .with_file("/data/home/.c")
            .with_symlink("/home/me/.a", "/data/home/.a")
            .with_file("/home/me/.b");
        let links = vec![
            LinkSpec::new("/data/home/.a", "/home/me/.a"),
            LinkSpec::new("/data/home/.b", "/home/me/.b"),
            LinkSpec::new("/data/home/.c", "/home/me/.c"),
        ];
        let report = Reconciler::new(&fs, &links).check();

        let statuses: Vec<LinkStatus> = report
            .entries
            .iter()
            .map(|e| *e.status.as_ref().unwrap())
            .collect();
        assert_eq!(
            statuses,
            vec![
                LinkStatus::Managed,
                LinkStatus::Unmanaged,
                LinkStatus::Missing
            ]
        );
        assert_eq!(report.flaws(), 2);
        assert!(report.is_degraded());
        assert!(fs.mutations().is_empty());
    }

    #[test]
    fn check_all_managed_is_not_degraded() {
        let fs = MockFileSystemOps::new().with_symlink("/home/me/.foo", "/data/home/.foo");
        let links = vec![foo()];
        assert!(!Reconciler::new(&fs, &links).check().is_degraded());
    }

    // -----------------------------------------------------------------------
    // install
    // -----------------------------------------------------------------------

    #[test]
    fn install_links_missing_entry_without_backup() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_dir("/home/me");
        let links = vec![foo()];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).install(&backup, false, false);

        assert!(matches!(
            report.entries[0].outcome,
            Outcome::Linked { backup: None }
        ));
        assert_eq!(fs.mutations(), vec!["symlink /home/me/.foo"]);
    }

    #[test]
    fn install_backs_up_before_linking() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_file("/home/me/.foo");
        let links = vec![foo()];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).install(&backup, false, false);

        assert_eq!(
            fs.mutations(),
            vec![
                format!("mkdir {BACKUP}"),
                "rename /home/me/.foo".to_string(),
                "symlink /home/me/.foo".to_string(),
            ]
        );
        assert_eq!(
            report.entries[0].outcome.performed_backup(),
            Some(&PathBuf::from(format!("{BACKUP}/.foo")))
        );
        assert_eq!(
            fs.entry_kind(Path::new(&format!("{BACKUP}/.foo"))).unwrap(),
            Some(EntryKind::File)
        );
    }

    #[test]
    fn install_skips_managed_entry() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_symlink("/home/me/.foo", "/data/home/.foo");
        let links = vec![foo()];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).install(&backup, false, false);

        assert!(matches!(
            report.entries[0].outcome,
            Outcome::Skipped(SkipReason::Managed)
        ));
        assert!(fs.mutations().is_empty());
    }

    #[test]
    fn install_twice_is_idempotent() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_file("/home/me/.foo");
        let links = vec![foo()];
        let backup = backup_dir();
        let reconciler = Reconciler::new(&fs, &links);

        let first = reconciler.install(&backup, false, false);
        assert_eq!(first.changes(), 1);
        let before = fs.mutations().len();

        let second = reconciler.install(&backup, false, false);
        assert_eq!(second.changes(), 0);
        assert_eq!(second.backups(), 0);
        assert_eq!(fs.mutations().len(), before);
    }

    #[test]
    fn install_dry_run_reports_without_mutating() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_file("/data/home/.bar")
            .with_file("/home/me/.foo");
        let links = vec![foo(), LinkSpec::new("/data/home/.bar", "/home/me/.bar")];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).install(&backup, true, false);

        assert!(fs.mutations().is_empty());
        assert!(matches!(
            &report.entries[0].outcome,
            Outcome::WouldLink { backup: Some(p) } if p == Path::new(&format!("{BACKUP}/.foo"))
        ));
        assert!(matches!(
            report.entries[1].outcome,
            Outcome::WouldLink { backup: None }
        ));
    }

    #[test]
    fn install_fails_on_missing_target_and_continues() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.bar")
            .with_file("/home/me/.foo");
        let links = vec![foo(), LinkSpec::new("/data/home/.bar", "/home/me/.bar")];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).install(&backup, false, false);

        assert!(matches!(
            report.entries[0].outcome,
            Outcome::Failed(LinkError::TargetMissing { .. })
        ));
        assert!(matches!(
            report.entries[1].outcome,
            Outcome::Linked { .. }
        ));
        assert!(!report.aborted);
        // The unmanaged file stays untouched.
        assert_eq!(fs.mutations(), vec!["symlink /home/me/.bar"]);
    }

    #[test]
    fn install_without_backup_leaves_unmanaged_entry() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_file("/home/me/.foo");
        let links = vec![foo()];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).install(&backup, false, true);

        assert!(matches!(
            report.entries[0].outcome,
            Outcome::Failed(LinkError::BackupDisabled { .. })
        ));
        assert!(fs.mutations().is_empty());
    }

    #[test]
    fn install_collision_fails_second_entry_only() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/a/.rc")
            .with_file("/data/b/.rc")
            .with_file("/home/me/.rc")
            .with_file("/etc/me/.rc");
        let links = vec![
            LinkSpec::new("/data/a/.rc", "/home/me/.rc"),
            LinkSpec::new("/data/b/.rc", "/etc/me/.rc"),
        ];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).install(&backup, false, false);

        assert!(matches!(report.entries[0].outcome, Outcome::Linked { .. }));
        assert!(matches!(
            report.entries[1].outcome,
            Outcome::Failed(LinkError::Collision { .. })
        ));
        assert!(!report.aborted);
        assert_eq!(
            fs.entry_kind(Path::new("/etc/me/.rc")).unwrap(),
            Some(EntryKind::File)
        );
    }

    #[test]
    fn install_does_not_create_missing_link_parent() {
        let fs = MockFileSystemOps::new().with_file("/data/config/nvim");
        let links = vec![LinkSpec::new("/data/config/nvim", "/home/me/.config/nvim")];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).install(&backup, false, false);

        assert!(matches!(
            report.entries[0].outcome,
            Outcome::Failed(LinkError::Io { .. })
        ));
        assert!(report.aborted);
        assert_eq!(fs.mutations(), vec!["symlink /home/me/.config/nvim"]);
        assert_eq!(fs.entry_kind(Path::new("/home/me/.config")).unwrap(), None);
    }

    #[test]
    fn install_io_error_stops_run_and_counts_unreached() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.a")
            .with_file("/data/home/.b")
            .with_file("/data/home/.c")
            .with_dir("/home/me")
            .fail_on("symlink", "/home/me/.b");
        let links = vec![
            LinkSpec::new("/data/home/.a", "/home/me/.a"),
            LinkSpec::new("/data/home/.b", "/home/me/.b"),
            LinkSpec::new("/data/home/.c", "/home/me/.c"),
        ];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).install(&backup, false, false);

        assert_eq!(report.entries.len(), 2);
        assert!(matches!(report.entries[0].outcome, Outcome::Linked { .. }));
        assert!(matches!(
            report.entries[1].outcome,
            Outcome::Failed(LinkError::Io { .. })
        ));
        assert!(report.aborted);
        assert_eq!(report.unreached, 1);
        assert!(report.has_failures());
        // The first link stays in place; the third is never attempted.
        assert_eq!(
            fs.entry_kind(Path::new("/home/me/.a")).unwrap(),
            Some(EntryKind::Symlink)
        );
        assert_eq!(
            fs.mutations(),
            vec!["symlink /home/me/.a", "symlink /home/me/.b"]
        );
    }

    #[test]
    fn uninstall_io_error_stops_run() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.a")
            .with_file("/data/home/.b")
            .with_symlink("/home/me/.a", "/data/home/.a")
            .with_symlink("/home/me/.b", "/data/home/.b")
            .fail_on("remove", "/home/me/.a");
        let links = vec![
            LinkSpec::new("/data/home/.a", "/home/me/.a"),
            LinkSpec::new("/data/home/.b", "/home/me/.b"),
        ];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).uninstall(&backup, false, true);

        assert!(report.aborted);
        assert_eq!(report.unreached, 1);
        assert_eq!(fs.mutations(), vec!["remove /home/me/.a"]);
        assert!(fs.is_symlink(Path::new("/home/me/.b")));
    }

    // -----------------------------------------------------------------------
    // uninstall
    // -----------------------------------------------------------------------

    #[test]
    fn uninstall_moves_link_into_backup() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_symlink("/home/me/.foo", "/data/home/.foo");
        let links = vec![foo()];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).uninstall(&backup, false, false);

        assert!(matches!(
            report.entries[0].outcome,
            Outcome::Removed { backup: Some(_) }
        ));
        assert_eq!(fs.entry_kind(Path::new("/home/me/.foo")).unwrap(), None);
        assert_eq!(
            fs.entry_kind(Path::new("/data/home/.foo")).unwrap(),
            Some(EntryKind::File)
        );
        assert_eq!(
            fs.entry_kind(Path::new(&format!("{BACKUP}/.foo"))).unwrap(),
            Some(EntryKind::Symlink)
        );
    }

    #[test]
    fn uninstall_without_backup_removes_link_only() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_symlink("/home/me/.foo", "/data/home/.foo");
        let links = vec![foo()];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).uninstall(&backup, false, true);

        assert!(matches!(
            report.entries[0].outcome,
            Outcome::Removed { backup: None }
        ));
        assert_eq!(fs.mutations(), vec!["remove /home/me/.foo"]);
        assert!(fs.exists(Path::new("/data/home/.foo")));
    }

    #[test]
    fn uninstall_skips_missing_and_unmanaged() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_file("/data/home/.bar")
            .with_file("/home/me/.bar");
        let links = vec![foo(), LinkSpec::new("/data/home/.bar", "/home/me/.bar")];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).uninstall(&backup, false, false);

        assert!(matches!(
            report.entries[0].outcome,
            Outcome::Skipped(SkipReason::DoesNotExist)
        ));
        assert!(matches!(
            report.entries[1].outcome,
            Outcome::Skipped(SkipReason::Unmanaged)
        ));
        assert!(fs.mutations().is_empty());
    }

    #[test]
    fn uninstall_leaves_entry_managed_through_parent() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/config/nvim/init.lua")
            .with_symlink("/home/me/.config/nvim", "/data/config/nvim");
        let links = vec![LinkSpec::new(
            "/data/config/nvim/init.lua",
            "/home/me/.config/nvim/init.lua",
        )];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).uninstall(&backup, false, false);

        assert_eq!(report.entries[0].status, Some(LinkStatus::Managed));
        assert!(matches!(
            report.entries[0].outcome,
            Outcome::Skipped(SkipReason::ManagedByParent)
        ));
        assert!(fs.mutations().is_empty());
    }

    #[test]
    fn uninstall_dry_run_reports_without_mutating() {
        let fs = MockFileSystemOps::new()
            .with_file("/data/home/.foo")
            .with_symlink("/home/me/.foo", "/data/home/.foo");
        let links = vec![foo()];
        let backup = backup_dir();
        let report = Reconciler::new(&fs, &links).uninstall(&backup, true, false);

        assert!(matches!(
            report.entries[0].outcome,
            Outcome::WouldRemove { backup: Some(_) }
        ));
        assert!(fs.mutations().is_empty());
    }

    // -----------------------------------------------------------------------
    // reports
    // -----------------------------------------------------------------------

    #[test]
    fn skip_reasons_render_like_status_lines() {
        assert_eq!(
            Outcome::Skipped(SkipReason::Managed).to_string(),
            "skip (managed)"
        );
        assert_eq!(
            Outcome::Skipped(SkipReason::DoesNotExist).to_string(),
            "skip (does not exist)"
        );
        assert_eq!(
            Outcome::Skipped(SkipReason::Unmanaged).to_string(),
            "skip (unmanaged)"
        );
    }

    #[test]
    fn report_counts_failures_and_abort() {
        let mut report = RunReport::default();
        assert!(!report.has_failures());
        report.entries.push(EntryReport {
            spec: foo(),
            status: Some(LinkStatus::Missing),
            outcome: Outcome::Failed(LinkError::TargetMissing {
                target: PathBuf::from("/data/home/.foo"),
            }),
        });
        assert_eq!(report.failures(), 1);
        assert!(report.has_failures());

        let aborted = RunReport {
            aborted: true,
            ..RunReport::default()
        };
        assert!(aborted.has_failures());
    }
}
