//! Link specification and classification.
use std::io;
use std::path::{Path, PathBuf};

use crate::operations::{EntryKind, FileSystemOps};

use super::LinkStatus;

/// One desired correspondence: `link` should be a symlink to `target`.
///
/// Both paths are absolute.  Built fresh by expanding the configuration on
/// every run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkSpec {
    /// Canonical storage location inside the data directory.
    pub target: PathBuf,
    /// Location where a consuming program expects to find the file.
    pub link: PathBuf,
}

impl LinkSpec {
    /// Create a new link specification.
    #[must_use]
    pub fn new(target: impl Into<PathBuf>, link: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            link: link.into(),
        }
    }

    /// Human-readable `link -> target` description.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} -> {}", self.link.display(), self.target.display())
    }

    /// Classify this entry against the current filesystem state.
    ///
    /// # Errors
    ///
    /// See [`classify`].
    pub fn status(&self, fs: &dyn FileSystemOps) -> io::Result<LinkStatus> {
        classify(fs, &self.target, &self.link)
    }
}

/// Compute the [`LinkStatus`] of `link` with respect to `target`.
///
/// In priority order:
///
/// 1. `link` fully resolves to `target`, or to `target` with only its
///    parent directory resolved: managed.  The final component of `target`
///    is never followed, so a link to wherever a data entry itself points
///    is not mistaken for a link to the data entry.
/// 2. `link` is a symlink: managed iff its raw one-level target equals
///    `target`, otherwise unmanaged.  Dangling links and cycles land here.
/// 3. Something else exists at `link`: unmanaged.
/// 4. Nothing exists: missing.
///
/// # Errors
///
/// Returns an error only when `link` cannot be inspected at all (e.g.
/// permission denied on its parent).  Dangling symlinks and symlink cycles
/// are classified, not reported as errors.
pub fn classify(fs: &dyn FileSystemOps, target: &Path, link: &Path) -> io::Result<LinkStatus> {
    if let Ok(resolved) = fs.canonicalize(link)
        && (resolved == target || resolve_parent(fs, target).is_some_and(|t| t == resolved))
    {
        return Ok(LinkStatus::Managed);
    }

    match fs.entry_kind(link)? {
        Some(EntryKind::Symlink) => {
            let raw = fs.read_link(link)?;
            if paths_equal(&raw, target) {
                Ok(LinkStatus::Managed)
            } else {
                Ok(LinkStatus::Unmanaged)
            }
        }
        Some(EntryKind::File | EntryKind::Dir) => Ok(LinkStatus::Unmanaged),
        None => Ok(LinkStatus::Missing),
    }
}

/// `target` with its parent canonicalized and its file name re-joined.
fn resolve_parent(fs: &dyn FileSystemOps, target: &Path) -> Option<PathBuf> {
    let name = target.file_name()?;
    let parent = fs.canonicalize(target.parent()?).ok()?;
    Some(parent.join(name))
}

/// Compare two paths for equality, normalising the `\\?\` prefix that
/// Windows `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}
