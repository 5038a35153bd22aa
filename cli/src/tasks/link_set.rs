//! Expansion of the configuration into the ordered links to reconcile.
use std::io;

use crate::config::Config;
use crate::config::symlinks::{DirectoryPair, SymlinkPair};
use crate::error::ConfigError;
use crate::operations::FileSystemOps;
use crate::resources::symlink::LinkSpec;

/// Where a group of links came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSource {
    /// Every immediate child of a managed directory.
    Directory(DirectoryPair),
    /// The explicit `symlinks` pairs.
    Explicit,
}

/// Links expanded from a single configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkGroup {
    /// Configuration entry the links were expanded from.
    pub source: LinkSource,
    /// Links, in expansion order.
    pub links: Vec<LinkSpec>,
}

impl LinkGroup {
    /// Heading printed before the group's entries.
    #[must_use]
    pub fn heading(&self) -> String {
        match &self.source {
            LinkSource::Directory(pair) => format!(
                "handle symlinks: {}/* <- {}/*",
                pair.data_dir.display(),
                pair.link_parent.display()
            ),
            LinkSource::Explicit => "handle symlinks: explicit pairs".to_string(),
        }
    }
}

/// The concrete, ordered sequence of links for one run.
///
/// Directory pairs come first in configuration order, then the explicit
/// pairs.  Children of one managed directory are sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    groups: Vec<LinkGroup>,
}

impl LinkSet {
    /// Expand `config` against the filesystem.
    ///
    /// # Errors
    ///
    /// See [`expand`].
    pub fn from_config(config: &Config, fs: &dyn FileSystemOps) -> Result<Self, ConfigError> {
        expand(&config.directories, &config.symlinks, fs)
    }

    /// Groups in expansion order.
    #[must_use]
    pub fn groups(&self) -> &[LinkGroup] {
        &self.groups
    }

    /// Every link, flattened in expansion order.
    pub fn links(&self) -> impl Iterator<Item = &LinkSpec> {
        self.groups.iter().flat_map(|g| g.links.iter())
    }

    /// Flattened copy of [`links`](Self::links).
    #[must_use]
    pub fn to_vec(&self) -> Vec<LinkSpec> {
        self.links().cloned().collect()
    }

    /// Total number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.links.len()).sum()
    }

    /// Returns `true` if no links were configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Expand directory pairs and explicit pairs into a [`LinkSet`].
///
/// Performs no mutation.
///
/// # Errors
///
/// Returns [`ConfigError::MissingDataDirectory`] if a directory pair names a
/// managed directory that does not exist, or [`ConfigError::Io`] if it
/// exists but cannot be listed.
pub fn expand(
    directories: &[DirectoryPair],
    symlinks: &[SymlinkPair],
    fs: &dyn FileSystemOps,
) -> Result<LinkSet, ConfigError> {
    let mut groups = Vec::with_capacity(directories.len() + 1);

    for pair in directories {
        let links = expand_directory(pair, fs)?;
        tracing::debug!(
            "expanded {} into {} link(s)",
            pair.data_dir.display(),
            links.len()
        );
        groups.push(LinkGroup {
            source: LinkSource::Directory(pair.clone()),
            links,
        });
    }

    if !symlinks.is_empty() {
        groups.push(LinkGroup {
            source: LinkSource::Explicit,
            links: symlinks
                .iter()
                .map(|pair| LinkSpec::new(&pair.target, &pair.link))
                .collect(),
        });
    }

    Ok(LinkSet { groups })
}

fn expand_directory(
    pair: &DirectoryPair,
    fs: &dyn FileSystemOps,
) -> Result<Vec<LinkSpec>, ConfigError> {
    let mut children = fs.read_dir(&pair.data_dir).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::MissingDataDirectory(pair.data_dir.clone())
        } else {
            ConfigError::Io {
                path: pair.data_dir.clone(),
                source,
            }
        }
    })?;

    children.sort();
    Ok(children
        .into_iter()
        .filter_map(|child| {
            let name = child.file_name()?.to_os_string();
            Some(LinkSpec::new(child, pair.link_parent.join(name)))
        })
        .collect())
}
