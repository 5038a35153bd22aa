//! Timestamped backup directory for entries displaced by install/uninstall.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDateTime;

use crate::operations::FileSystemOps;

use super::error::LinkError;

/// `strftime` pattern for the per-run backup directory name.
pub const BACKUP_DIR_FORMAT: &str = "backup%Y-%d-%m_%H-%M-%S";

/// The backup directory of a single run.
///
/// The timestamp is fixed at construction, so every entry backed up during
/// one install or uninstall lands in the same directory.  The directory is
/// created lazily on the first [`backup`](Self::backup) call.
#[derive(Debug)]
pub struct BackupDir {
    path: PathBuf,
    created: OnceLock<()>,
}

impl BackupDir {
    /// Backup directory under `root` named after `started`.
    #[must_use]
    pub fn new(root: &Path, started: NaiveDateTime) -> Self {
        Self {
            path: root.join(started.format(BACKUP_DIR_FORMAT).to_string()),
            created: OnceLock::new(),
        }
    }

    /// Backup directory under `root` named after the current local time.
    #[must_use]
    pub fn for_run(root: &Path) -> Self {
        Self::new(root, chrono::Local::now().naive_local())
    }

    /// Path of this run's backup directory (which may not exist yet).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where `entry` will be moved by [`backup`](Self::backup).
    ///
    /// # Errors
    ///
    /// Returns an error if `entry` has no file name (e.g. `/`).
    pub fn destination_for(&self, entry: &Path) -> Result<PathBuf, LinkError> {
        entry
            .file_name()
            .map(|name| self.path.join(name))
            .ok_or_else(|| {
                LinkError::io(
                    entry,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
                )
            })
    }

    /// Move `entry` into the backup directory, keeping its base name.
    ///
    /// Symlinks are moved as-is, never followed.  Returns the new location.
    ///
    /// # Errors
    ///
    /// - [`LinkError::Collision`] if the destination name is already taken
    ///   in this run's backup directory; nothing is moved.
    /// - [`LinkError::Io`] if `entry` does not exist, the directory cannot be
    ///   created, or the move fails (permissions, cross-device).
    pub fn backup(&self, fs: &dyn FileSystemOps, entry: &Path) -> Result<PathBuf, LinkError> {
        let destination = self.destination_for(entry)?;
        if !fs.exists(entry) {
            return Err(LinkError::io(
                entry,
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }

        self.ensure_created(fs)?;

        if fs.exists(&destination) {
            return Err(LinkError::Collision {
                path: entry.to_path_buf(),
                destination,
            });
        }

        fs.rename(entry, &destination)
            .map_err(|source| LinkError::io(entry, source))?;
        tracing::debug!(
            "backed up {} to {}",
            entry.display(),
            destination.display()
        );
        Ok(destination)
    }

    fn ensure_created(&self, fs: &dyn FileSystemOps) -> Result<(), LinkError> {
        if self.created.get().is_none() {
            fs.create_dir_all(&self.path)
                .map_err(|source| LinkError::io(&self.path, source))?;
            self.created.get_or_init(|| ());
        }
        Ok(())
    }
}
