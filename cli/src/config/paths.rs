//! Home-directory lookup and `~` expansion for configured paths.
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The user's home directory from `HOME` (or `USERPROFILE` on Windows).
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME"))
    } else {
        std::env::var("HOME")
    };
    var.ok().filter(|h| !h.is_empty()).map(PathBuf::from)
}

/// Expand a configured path into an absolute one.
///
/// `~` and `~/...` expand against `home`; other relative paths resolve
/// against `base`.  `~user` forms are not supported and are treated as
/// relative names.
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotSet`] if `raw` starts with `~` and `home`
/// is `None`.
pub fn expand(raw: &str, home: Option<&Path>, base: &Path) -> Result<PathBuf, ConfigError> {
    let tilde_rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/")
            .or_else(|| raw.strip_prefix("~\\"))
    };

    if let Some(rest) = tilde_rest {
        let home = home.ok_or(ConfigError::HomeNotSet)?;
        return Ok(if rest.is_empty() {
            home.to_path_buf()
        } else {
            home.join(rest)
        });
    }

    let path = Path::new(raw);
    Ok(if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    })
}

/// Expand a path given on the command line: `~` against the home
/// directory, relative paths against the current directory.
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotSet`] if `raw` starts with `~` and no home
/// directory is known.
pub fn expand_cli_path(raw: &Path) -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    expand(&raw.to_string_lossy(), home_dir().as_deref(), &cwd)
}
