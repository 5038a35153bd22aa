//! Declarative configuration: TOML parsing, path expansion, validation.
pub mod paths;
pub mod symlinks;
pub mod toml_loader;
pub mod validation;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::operations::FileSystemOps;

use symlinks::{DirectoryEntry, DirectoryPair, SymlinkEntry, SymlinkPair};
use validation::{ConfigValidator as _, DirectoryValidator, SymlinkValidator, ValidationWarning};

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "~/.dotfiles/punkt.toml";

/// Default data root holding the managed files.
pub const DEFAULT_DATA_PATH: &str = "~/.dotfiles/data";

/// Default root under which per-run backup directories are created.
pub const DEFAULT_BACKUP_PATH: &str = "~/.cache/punkt";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "PUNKT_CONFIG";

/// On-disk shape of the config file.  Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_path: Option<String>,
    backup_path: Option<String>,
    #[serde(default)]
    directories: Vec<DirectoryEntry>,
    #[serde(default)]
    symlinks: Vec<SymlinkEntry>,
}

/// Loaded configuration with every path expanded to an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The file this configuration was read from.
    pub path: PathBuf,
    /// Data root holding the managed files.
    pub data_path: PathBuf,
    /// Root for per-run backup directories.
    pub backup_path: PathBuf,
    /// Directory pairs, in file order.
    pub directories: Vec<DirectoryPair>,
    /// Explicit symlink pairs, in file order.
    pub symlinks: Vec<SymlinkPair>,
}

impl Config {
    /// Load the config file at `path`, expanding `~` against the current
    /// user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, not valid TOML,
    /// or uses `~` while no home directory is known.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_home(path, paths::home_dir().as_deref())
    }

    /// Like [`load`](Self::load) with an explicit home directory.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with_home(path: &Path, home: Option<&Path>) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml_loader::load_config(path)?;
        Self::resolve(file, path, home)
    }

    /// Parse configuration from `content` as if read from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML or uses `~` while
    /// `home` is `None`.
    pub fn from_toml_str(
        content: &str,
        path: &Path,
        home: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml_loader::parse_config(content, path)?;
        Self::resolve(file, path, home)
    }

    fn resolve(file: ConfigFile, path: &Path, home: Option<&Path>) -> Result<Self, ConfigError> {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let expand = |raw: &str| paths::expand(raw, home, base);

        let data_path = expand(file.data_path.as_deref().unwrap_or(DEFAULT_DATA_PATH))?;
        let backup_path = expand(file.backup_path.as_deref().unwrap_or(DEFAULT_BACKUP_PATH))?;

        let directories = file
            .directories
            .into_iter()
            .map(|entry| {
                let (data, link) = entry.into_parts();
                Ok(DirectoryPair {
                    data_dir: data_path.join(data),
                    link_parent: expand(&link)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let symlinks = file
            .symlinks
            .into_iter()
            .map(|entry| {
                let (target, link) = entry.into_parts();
                Ok(SymlinkPair {
                    target: expand(&target)?,
                    link: expand(&link)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            data_path,
            backup_path,
            directories,
            symlinks,
        })
    }

    /// Run all configuration validators and collect their warnings.
    #[must_use]
    pub fn validate(&self, fs: &dyn FileSystemOps) -> Vec<ValidationWarning> {
        let mut warnings = DirectoryValidator::new(&self.directories).validate(fs);
        warnings.extend(SymlinkValidator::new(&self.symlinks).validate(fs));
        warnings
    }
}

/// Resolve which config file to load: explicit path, then the
/// [`CONFIG_ENV_VAR`] environment variable, then [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotSet`] if the chosen path starts with `~`
/// and no home directory is known.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return paths::expand_cli_path(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR)
        && !path.is_empty()
    {
        return paths::expand_cli_path(Path::new(&path));
    }
    paths::expand_cli_path(Path::new(DEFAULT_CONFIG_PATH))
}
