//! Fold an existing file into management: move it into the data directory
//! and leave a managed link in its place.
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::config::symlinks::DirectoryPair;
use crate::error::AddError;
use crate::operations::FileSystemOps;

/// Result of a successful [`AddOperation::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    /// The original path, now a symlink.
    pub link: PathBuf,
    /// Where the content now lives inside the data directory.
    pub target: PathBuf,
}

/// Moves unmanaged entries from a managed link location into the data
/// directory.
///
/// Only direct children of a directory pair's link parent are supported.
#[derive(Debug)]
pub struct AddOperation<'a> {
    fs: &'a dyn FileSystemOps,
    directories: &'a [DirectoryPair],
    data_path: &'a Path,
}

impl<'a> AddOperation<'a> {
    /// Create an add operation over the given directory pairs.
    #[must_use]
    pub const fn new(
        fs: &'a dyn FileSystemOps,
        directories: &'a [DirectoryPair],
        data_path: &'a Path,
    ) -> Self {
        Self {
            fs,
            directories,
            data_path,
        }
    }

    /// Create an add operation from a loaded configuration.
    #[must_use]
    pub fn from_config(fs: &'a dyn FileSystemOps, config: &'a Config) -> Self {
        Self::new(fs, &config.directories, &config.data_path)
    }

    /// Move `path` into the data directory and replace it with a link.
    ///
    /// `path` must be absolute.  All preconditions are checked before
    /// anything is moved.
    ///
    /// # Errors
    ///
    /// In check order: [`AddError::NotFound`], [`AddError::UnsupportedLocation`],
    /// [`AddError::TargetExists`], [`AddError::AlreadyManaged`].  Then
    /// [`AddError::MoveFailed`] if the move fails (no link is created) or
    /// [`AddError::LinkFailed`] if the content was moved but the link could
    /// not be created.
    pub fn add(&self, path: &Path) -> Result<Added, AddError> {
        let target = self.plan(path)?;

        self.fs
            .rename(path, &target)
            .map_err(|source| AddError::MoveFailed {
                from: path.to_path_buf(),
                to: target.clone(),
                source,
            })?;
        tracing::debug!("moved {} to {}", path.display(), target.display());

        self.fs
            .symlink(&target, path)
            .map_err(|source| AddError::LinkFailed {
                link: path.to_path_buf(),
                moved_to: target.clone(),
                source,
            })?;
        tracing::debug!("linked {} -> {}", path.display(), target.display());

        Ok(Added {
            link: path.to_path_buf(),
            target,
        })
    }

    /// Check every precondition and return the location `path` would be
    /// moved to.
    fn plan(&self, path: &Path) -> Result<PathBuf, AddError> {
        if !self.fs.exists(path) {
            return Err(AddError::NotFound(path.to_path_buf()));
        }

        let parent = path.parent().unwrap_or(path);
        let (pair, name) = self
            .directories
            .iter()
            .find(|pair| pair.link_parent == parent)
            .zip(path.file_name())
            .ok_or_else(|| AddError::UnsupportedLocation(parent.to_path_buf()))?;

        let target = pair.data_dir.join(name);
        if self.fs.exists(&target) {
            return Err(AddError::TargetExists(target));
        }

        if self.fs.is_symlink(path)
            && let Ok(raw) = self.fs.read_link(path)
            && self.points_into_data(parent, &raw)
        {
            return Err(AddError::AlreadyManaged {
                path: path.to_path_buf(),
                points_to: raw,
            });
        }

        Ok(target)
    }

    fn points_into_data(&self, parent: &Path, raw: &Path) -> bool {
        let absolute = parent.join(raw);
        if absolute.starts_with(self.data_path) {
            return true;
        }
        match (
            self.fs.canonicalize(&absolute),
            self.fs.canonicalize(self.data_path),
        ) {
            (Ok(resolved), Ok(root)) => resolved.starts_with(root),
            _ => false,
        }
    }
}
