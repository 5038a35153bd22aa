//! Configuration validation producing non-fatal warnings.
use std::collections::HashMap;
use std::path::PathBuf;

use crate::operations::FileSystemOps;
use crate::resources::symlink::LinkSpec;

use super::symlinks::{DirectoryPair, SymlinkPair};

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration section (e.g., "symlinks", "directories").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a new warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
///
/// Validators only ever warn: anything that must stop a run is reported as
/// a [`ConfigError`](crate::error::ConfigError) instead.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self, fs: &dyn FileSystemOps) -> Vec<ValidationWarning>;

    /// Return a human-readable name for this validator (e.g., "symlinks").
    fn name(&self) -> &'static str;
}

/// Validator for explicit symlink pairs.
#[derive(Debug)]
pub struct SymlinkValidator<'a> {
    symlinks: &'a [SymlinkPair],
}

impl<'a> SymlinkValidator<'a> {
    /// Validate the given explicit pairs.
    #[must_use]
    pub const fn new(symlinks: &'a [SymlinkPair]) -> Self {
        Self { symlinks }
    }
}

impl ConfigValidator for SymlinkValidator<'_> {
    fn validate(&self, fs: &dyn FileSystemOps) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for pair in self.symlinks {
            let item = pair.link.display().to_string();

            if fs.canonicalize(&pair.target).is_err() {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &item,
                    format!("target does not exist: {}", pair.target.display()),
                ));
            }

            if let Some(parent) = pair.link.parent()
                && fs.canonicalize(parent).is_err()
            {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &item,
                    format!("link parent does not exist: {}", parent.display()),
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "symlinks"
    }
}

/// Validator for directory pairs.
#[derive(Debug)]
pub struct DirectoryValidator<'a> {
    directories: &'a [DirectoryPair],
}

impl<'a> DirectoryValidator<'a> {
    /// Validate the given directory pairs.
    #[must_use]
    pub const fn new(directories: &'a [DirectoryPair]) -> Self {
        Self { directories }
    }
}

impl ConfigValidator for DirectoryValidator<'_> {
    fn validate(&self, fs: &dyn FileSystemOps) -> Vec<ValidationWarning> {
        self.directories
            .iter()
            .filter(|pair| fs.canonicalize(&pair.link_parent).is_err())
            .map(|pair| {
                ValidationWarning::new(
                    self.name(),
                    pair.data_dir.display().to_string(),
                    format!("link parent does not exist: {}", pair.link_parent.display()),
                )
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "directories"
    }
}

/// Validator for the expanded link set: flags link paths claimed twice.
///
/// Conflicting targets are not resolved automatically; the second entry
/// will simply classify against whatever the first one installed.
#[derive(Debug)]
pub struct DuplicateLinkValidator<'a> {
    links: &'a [LinkSpec],
}

impl<'a> DuplicateLinkValidator<'a> {
    /// Validate the given expanded links.
    #[must_use]
    pub const fn new(links: &'a [LinkSpec]) -> Self {
        Self { links }
    }
}

impl ConfigValidator for DuplicateLinkValidator<'_> {
    fn validate(&self, _fs: &dyn FileSystemOps) -> Vec<ValidationWarning> {
        let mut seen: HashMap<&PathBuf, &PathBuf> = HashMap::new();
        let mut warnings = Vec::new();

        for spec in self.links {
            if let Some(first) = seen.get(&spec.link) {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    spec.link.display().to_string(),
                    format!(
                        "link configured twice: {} and {}",
                        first.display(),
                        spec.target.display()
                    ),
                ));
            } else {
                seen.insert(&spec.link, &spec.target);
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "links"
    }
}
