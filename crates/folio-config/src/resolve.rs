//! Path resolution for configured directories.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a configured path against the directory of the file declaring it.
///
/// `~` and `~/...` expand to the home directory; other relative paths are
/// joined onto `config_dir`. The path need not exist yet.
pub fn resolve_config_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(config_dir.join(expanded))
    }
}

/// Expands a leading `~` to the home directory.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None => Ok(PathBuf::from(path)),
    }
}

/// Returns the user's home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_joins_config_dir() {
        let resolved = resolve_config_path("var/index", Path::new("/srv/docs")).unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/docs/var/index"));
    }

    #[test]
    fn absolute_path_kept() {
        let resolved = resolve_config_path("/data/index", Path::new("/srv/docs")).unwrap();
        assert_eq!(resolved, PathBuf::from("/data/index"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(dirs) = BaseDirs::new() else {
            return;
        };
        let resolved = resolve_config_path("~/folio", Path::new("/srv")).unwrap();
        assert_eq!(resolved, dirs.home_dir().join("folio"));
    }

    #[test]
    fn tilde_in_middle_is_literal() {
        let resolved = resolve_config_path("a/~/b", Path::new("/srv")).unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/a/~/b"));
    }
}
