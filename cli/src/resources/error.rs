//! Typed error variants for per-link operations.
//!
//! [`LinkError`] is what install and uninstall record against a single
//! entry.  Callers convert to [`anyhow::Error`] via `?` where needed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while installing, removing, or backing up one link.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The backup destination already exists; nothing was moved.
    #[error("backup collision: {} already exists (backing up {})", .destination.display(), .path.display())]
    Collision {
        /// Entry that was about to be backed up.
        path: PathBuf,
        /// Occupied destination inside the backup directory.
        destination: PathBuf,
    },

    /// Install was asked to link to a target that does not exist.
    #[error("target does not exist: {}", .target.display())]
    TargetMissing {
        /// The missing target path.
        target: PathBuf,
    },

    /// The link path holds unmanaged content and backups are disabled.
    #[error("refusing to replace unmanaged {} with backups disabled", .link.display())]
    BackupDisabled {
        /// The occupied link path.
        link: PathBuf,
    },

    /// An underlying filesystem call failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path the failing call operated on.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl LinkError {
    /// Wrap an I/O error with the path it concerns.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts the rest of the run.
    ///
    /// Only raw I/O failures do; the other variants are local to the entry.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
