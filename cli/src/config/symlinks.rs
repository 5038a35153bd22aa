//! Directory-pair and explicit-symlink configuration entries.
use serde::Deserialize;
use std::path::PathBuf;

/// A managed directory whose immediate children are each linked into
/// `link_parent` under the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPair {
    /// Absolute path of the managed subdirectory inside the data root.
    pub data_dir: PathBuf,
    /// Absolute path of the directory the links are created in.
    pub link_parent: PathBuf,
}

/// An explicit `link -> target` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkPair {
    /// Absolute path the link should point to.
    pub target: PathBuf,
    /// Absolute path where the link is created.
    pub link: PathBuf,
}

/// A single `directories` entry: either `["home", "~"]` or
/// `{ data = "home", link = "~" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum DirectoryEntry {
    /// Two-element array: data subdirectory name, link parent.
    Pair(String, String),
    /// Table with named fields.
    Table {
        /// Data subdirectory name, relative to the data root.
        data: String,
        /// Directory the links are created in.
        link: String,
    },
}

impl DirectoryEntry {
    pub(super) fn into_parts(self) -> (String, String) {
        match self {
            Self::Pair(data, link) | Self::Table { data, link } => (data, link),
        }
    }
}

/// A single `symlinks` entry: either `["~/x/vimrc", "~/.vimrc"]` or
/// `{ target = "~/x/vimrc", link = "~/.vimrc" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum SymlinkEntry {
    /// Two-element array: target, link.
    Pair(String, String),
    /// Table with named fields.
    Table {
        /// Path the link points to.
        target: String,
        /// Path of the link itself.
        link: String,
    },
}

impl SymlinkEntry {
    pub(super) fn into_parts(self) -> (String, String) {
        match self {
            Self::Pair(target, link) | Self::Table { target, link } => (target, link),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Doc {
        directories: Vec<DirectoryEntry>,
        symlinks: Vec<SymlinkEntry>,
    }

    #[test]
    fn accepts_arrays_and_tables() {
        let doc: Doc = toml::from_str(
            r#"
directories = [["home", "~"], { data = "config", link = "~/.config" }]
symlinks = [["/a", "/b"], { target = "/c", link = "/d" }]
"#,
        )
        .unwrap();

        let dirs: Vec<(String, String)> = doc
            .directories
            .into_iter()
            .map(DirectoryEntry::into_parts)
            .collect();
        assert_eq!(
            dirs,
            vec![
                ("home".to_string(), "~".to_string()),
                ("config".to_string(), "~/.config".to_string()),
            ]
        );

        let links: Vec<(String, String)> = doc
            .symlinks
            .into_iter()
            .map(SymlinkEntry::into_parts)
            .collect();
        assert_eq!(links[0], ("/a".to_string(), "/b".to_string()));
        assert_eq!(links[1], ("/c".to_string(), "/d".to_string()));
    }

    #[test]
    fn rejects_three_element_array() {
        let result: Result<Doc, _> =
            toml::from_str("directories = [[\"a\", \"b\", \"c\"]]\nsymlinks = []\n");
        assert!(result.is_err());
    }
}
