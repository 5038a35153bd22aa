//! Filesystem primitives behind a trait for dependency injection.
//!
//! Every filesystem call the link engine makes goes through
//! [`FileSystemOps`], so classification and reconciliation can be
//! unit-tested against an in-memory tree.  Production code uses
//! [`SystemFileSystemOps`]; unit tests use `MockFileSystemOps`.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// What occupies a path, observed without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (or anything that is neither a directory nor a symlink).
    File,
    /// A real directory.
    Dir,
    /// A symbolic link, dangling or not.
    Symlink,
}

/// Abstraction over the filesystem calls used by the link engine.
///
/// Read operations never follow the final symlink unless their name says
/// so ([`canonicalize`](Self::canonicalize)).  Mutating operations never
/// overwrite: callers check for collisions first.
pub trait FileSystemOps: Send + Sync + fmt::Debug {
    /// Inspect `path` without following a final symlink.
    ///
    /// Returns `Ok(None)` when nothing (not even a dangling symlink) exists.
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than "not found", such as
    /// permission denied on an ancestor directory.
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Read the raw, one-level target of the symlink at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Resolve every symlink in `path` and return the absolute result.
    ///
    /// # Errors
    ///
    /// Returns an error if any component is missing, a link dangles, or a
    /// symlink cycle is detected.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Return the immediate child paths inside the directory `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Create `path` and all of its missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Move `from` to `to` without following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error on permission failures or when `from` and `to` are on
    /// different filesystems.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create a symlink at `link` whose raw target is `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `link` already exists or its parent is missing.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Remove the symlink object at `path` (never its target).
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_link(&self, path: &Path) -> io::Result<()>;

    /// Returns `true` if anything exists at `path`, including a dangling symlink.
    fn exists(&self, path: &Path) -> bool {
        matches!(self.entry_kind(path), Ok(Some(_)))
    }

    /// Returns `true` if `path` is a symlink, dangling or not.
    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.entry_kind(path), Ok(Some(EntryKind::Symlink)))
    }
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => Ok(Some(EntryKind::Symlink)),
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Dir)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        // dunce strips the `\\?\` prefix Windows adds, so results compare
        // equal to the plain paths coming from configuration.
        dunce::canonicalize(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if is_dir_like(&meta) {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    }
}

/// Check if metadata represents a directory-like entry.
///
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks, which must still be removed with `remove_dir`, so the raw
/// `FILE_ATTRIBUTE_DIRECTORY` bit is checked instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir() && !meta.file_type().is_symlink()
    }
}

/// Maximum symlink hops the mock follows before reporting a cycle.
#[cfg(test)]
const MOCK_MAX_HOPS: usize = 40;

/// A node in the [`MockFileSystemOps`] tree.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
enum MockNode {
    File,
    Dir,
    Symlink(PathBuf),
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Build a tree with the builder methods, then inspect
/// [`mutations`](Self::mutations) to assert which mutating calls were made.
/// Parents of every registered path are created implicitly as directories.
///
/// # Example
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_file("/data/home/.foo")
///     .with_symlink("/home/me/.foo", "/data/home/.foo");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    nodes: std::sync::Mutex<std::collections::BTreeMap<PathBuf, MockNode>>,
    mutations: std::sync::Mutex<Vec<String>>,
    faults: std::sync::Mutex<Vec<(String, PathBuf)>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock containing only the root directory.
    #[must_use]
    pub fn new() -> Self {
        let mock = Self::default();
        mock.insert(Path::new("/"), MockNode::Dir);
        mock
    }

    /// Register a regular file at `path`.
    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), MockNode::File);
        self
    }

    /// Register a directory at `path`.
    #[must_use]
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), MockNode::Dir);
        self
    }

    /// Register a symlink at `path` whose raw target is `target`.
    #[must_use]
    pub fn with_symlink(self, path: impl AsRef<Path>, target: impl Into<PathBuf>) -> Self {
        self.insert(path.as_ref(), MockNode::Symlink(target.into()));
        self
    }

    /// Make the mutating call `op` (`"mkdir"`, `"rename"`, `"symlink"` or
    /// `"remove"`) fail with `PermissionDenied` when it targets `path`.
    /// The call is still recorded in [`mutations`](Self::mutations).
    #[must_use]
    pub fn fail_on(self, op: &str, path: impl Into<PathBuf>) -> Self {
        self.faults
            .lock()
            .expect("mock faults poisoned")
            .push((op.to_string(), path.into()));
        self
    }

    /// Every mutating call made so far, formatted as `"<op> <path>"`.
    #[must_use]
    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().expect("mock mutations poisoned").clone()
    }

    fn insert(&self, path: &Path, node: MockNode) {
        let mut nodes = self.nodes.lock().expect("mock nodes poisoned");
        let mut ancestor = path.parent();
        while let Some(dir) = ancestor {
            nodes.entry(dir.to_path_buf()).or_insert(MockNode::Dir);
            ancestor = dir.parent();
        }
        nodes.insert(path.to_path_buf(), node);
    }

    fn record(&self, op: &str, path: &Path) -> io::Result<()> {
        self.mutations
            .lock()
            .expect("mock mutations poisoned")
            .push(format!("{op} {}", path.display()));
        let faulted = self
            .faults
            .lock()
            .expect("mock faults poisoned")
            .iter()
            .any(|(o, p)| o == op && p == path);
        if faulted {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        Ok(())
    }

    fn node(&self, path: &Path) -> Option<MockNode> {
        self.nodes
            .lock()
            .expect("mock nodes poisoned")
            .get(path)
            .cloned()
    }

    fn resolve(&self, path: &Path, hops: &mut usize) -> io::Result<PathBuf> {
        use std::path::Component;

        let mut out = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => out.push(component),
                Component::CurDir => {}
                Component::ParentDir => {
                    out.pop();
                }
                Component::Normal(name) => {
                    out.push(name);
                    match self.node(&out) {
                        None => return Err(io::Error::from(io::ErrorKind::NotFound)),
                        Some(MockNode::Symlink(raw)) => {
                            *hops += 1;
                            if *hops > MOCK_MAX_HOPS {
                                return Err(io::Error::other("too many levels of symbolic links"));
                            }
                            let next = out.parent().map_or_else(|| raw.clone(), |p| p.join(&raw));
                            out = self.resolve(&next, hops)?;
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        Ok(self.node(path).map(|node| match node {
            MockNode::File => EntryKind::File,
            MockNode::Dir => EntryKind::Dir,
            MockNode::Symlink(_) => EntryKind::Symlink,
        }))
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        match self.node(path) {
            Some(MockNode::Symlink(raw)) => Ok(raw),
            Some(_) => Err(io::Error::from(io::ErrorKind::InvalidInput)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.resolve(path, &mut 0)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if self.node(path) != Some(MockNode::Dir) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        Ok(self
            .nodes
            .lock()
            .expect("mock nodes poisoned")
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.record("mkdir", path)?;
        self.insert(path, MockNode::Dir);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.record("rename", from)?;
        let mut nodes = self.nodes.lock().expect("mock nodes poisoned");
        let moved: Vec<(PathBuf, MockNode)> = nodes
            .iter()
            .filter(|(p, _)| p.starts_with(from))
            .map(|(p, n)| (p.clone(), n.clone()))
            .collect();
        if moved.is_empty() {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        for (old, node) in moved {
            nodes.remove(&old);
            let suffix = old.strip_prefix(from).unwrap_or(&old);
            let new = if suffix.as_os_str().is_empty() {
                to.to_path_buf()
            } else {
                to.join(suffix)
            };
            nodes.insert(new, node);
        }
        drop(nodes);
        Ok(())
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        self.record("symlink", link)?;
        if self.node(link).is_some() {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        let parent = link.parent().map(|p| self.canonicalize(p));
        if !matches!(parent, Some(Ok(ref dir)) if self.node(dir) == Some(MockNode::Dir)) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        self.insert(link, MockNode::Symlink(target.to_path_buf()));
        Ok(())
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        self.record("remove", path)?;
        self.nodes
            .lock()
            .expect("mock nodes poisoned")
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}
