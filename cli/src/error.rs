//! Domain-specific error types for the link engine.
//!
//! Internal modules return typed errors ([`ConfigError`], [`LinkError`],
//! [`AddError`]) while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! PunktError
//! ├── Config(ConfigError) - config file, path expansion, managed directories
//! ├── Link(LinkError)     - per-entry install/uninstall/backup failures
//! └── Add(AddError)       - folding an existing file into management
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use crate::resources::error::LinkError;

/// Top-level error type for the link engine.
#[derive(Error, Debug)]
pub enum PunktError {
    /// Configuration-related error; raised before any mutation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A single link could not be installed, removed, or backed up.
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// The add operation failed.
    #[error("Add error: {0}")]
    Add(#[from] AddError),
}

/// Errors that arise from loading the configuration and expanding it into
/// concrete links.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The config file is not valid TOML or has an unexpected shape.
    #[error("Invalid TOML in {}: {message}", .file.display())]
    InvalidSyntax {
        /// Path of the offending file.
        file: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A directory pair names a managed directory that does not exist.
    #[error("managed directory does not exist: {}", .0.display())]
    MissingDataDirectory(PathBuf),

    /// A `~` path was configured but no home directory is known.
    #[error("cannot expand '~': neither HOME nor USERPROFILE is set")]
    HomeNotSet,

    /// An I/O error occurred while reading configuration or a managed directory.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors from the add operation, in the order its checks run.
#[derive(Error, Debug)]
pub enum AddError {
    /// The path to add does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path's parent is not the link location of any directory pair.
    #[error("is not a managed directory: {}", .0.display())]
    UnsupportedLocation(PathBuf),

    /// The computed location inside the data directory is already taken.
    #[error("target already exists: {}", .0.display())]
    TargetExists(PathBuf),

    /// The path is already a symlink into the data root.
    #[error("already links into dotfiles: {} -> {}", .path.display(), .points_to.display())]
    AlreadyManaged {
        /// The path that was to be added.
        path: PathBuf,
        /// Where it currently points.
        points_to: PathBuf,
    },

    /// Moving the path into the data directory failed; no link was created.
    #[error("moving {} to {} failed: {source}", .from.display(), .to.display())]
    MoveFailed {
        /// Original location.
        from: PathBuf,
        /// Intended location inside the data directory.
        to: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The content was moved but the link could not be created.
    #[error("moved to {} but creating link {} failed: {source}", .moved_to.display(), .link.display())]
    LinkFailed {
        /// Link that still needs to be created manually.
        link: PathBuf,
        /// Where the content now lives.
        moved_to: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
