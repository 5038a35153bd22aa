//! Per-link primitives: classification, backup, and their errors.
pub mod backup;
pub mod error;
pub mod symlink;

use std::fmt;

/// Status of one configured link, computed from the filesystem on demand.
///
/// Never stored: classify again whenever the current value is needed.
///
/// # Examples
///
/// ```
/// use punkt_cli::resources::LinkStatus;
///
/// assert!(LinkStatus::Managed.is_managed());
/// assert!(!LinkStatus::Missing.is_managed());
/// assert_eq!(LinkStatus::Unmanaged.to_string(), "unmanaged");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    /// The link path is a symlink to the managed target (or resolves to it).
    Managed,
    /// Something occupies the link path but it is not the managed link.
    Unmanaged,
    /// Nothing exists at the link path, not even a dangling symlink.
    Missing,
}

impl LinkStatus {
    /// Returns `true` for [`LinkStatus::Managed`].
    #[must_use]
    pub const fn is_managed(self) -> bool {
        matches!(self, Self::Managed)
    }

    /// Lower-case label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Managed => "managed",
            Self::Unmanaged => "unmanaged",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_managed_is_managed() {
        assert!(LinkStatus::Managed.is_managed());
        assert!(!LinkStatus::Unmanaged.is_managed());
        assert!(!LinkStatus::Missing.is_managed());
    }

    #[test]
    fn labels_are_lowercase() {
        assert_eq!(LinkStatus::Managed.to_string(), "managed");
        assert_eq!(LinkStatus::Missing.to_string(), "missing");
        assert_eq!(LinkStatus::Unmanaged.to_string(), "unmanaged");
    }
}
