//! Configuration file discovery.
//!
//! Walks up the directory tree looking for `.folio.toml`, then appends the
//! global `~/.folio.toml` unless a `root = true` file ended the walk.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".folio.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global last.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    for dir in cwd.ancestors() {
        let config_path = dir.join(CONFIG_FILENAME);
        if !config_path.is_file() {
            continue;
        }
        let is_root = is_root_config(&config_path);
        configs.push(config_path);
        if is_root {
            found_root = true;
            break;
        }
    }

    if !found_root
        && let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        configs.push(global_path);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.folio.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    /// Drops the global config, which depends on the machine running the tests.
    fn local_only(configs: Vec<PathBuf>) -> Vec<PathBuf> {
        configs.into_iter().filter(|p| !is_global_config(p)).collect()
    }

    #[test]
    fn no_configs() {
        let test_dir = TestDir::new();
        let subdir = test_dir.create_dir("a/b/c");
        assert!(local_only(discover_config_files(&subdir)).is_empty());
    }

    #[test]
    fn config_in_cwd() {
        let test_dir = TestDir::new();
        let config = test_dir.create_config("project");
        let found = local_only(discover_config_files(&test_dir.path().join("project")));
        assert_eq!(found, vec![config]);
    }

    #[test]
    fn closest_config_first() {
        let test_dir = TestDir::new();
        let outer = test_dir.create_config_at_root();
        let inner = test_dir.create_config("a/b");
        let cwd = test_dir.create_dir("a/b/c");

        let found = local_only(discover_config_files(&cwd));
        let position = |p: &PathBuf| found.iter().position(|f| f == p);
        assert!(position(&inner) < position(&outer));
        assert!(position(&outer).is_some());
    }

    #[test]
    fn root_config_stops_walk() {
        let test_dir = TestDir::new();
        test_dir.create_config_at_root();
        let root = test_dir.create_root_config("project");
        let cwd = test_dir.create_dir("project/docs");

        assert_eq!(discover_config_files(&cwd), vec![root]);
    }
}
