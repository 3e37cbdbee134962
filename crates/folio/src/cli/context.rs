//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use folio_config::Config;
use folio_index::{IndexStore, StoreOptions};

use super::args::IndexDirArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
    /// Verbosity requested with `-v`.
    pub verbose: u8,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self::new(cwd, config))
    }

    /// Builds a context from explicit parts.
    pub fn new(cwd: PathBuf, config: Config) -> Self {
        Self {
            cwd,
            config,
            verbose: 0,
        }
    }

    /// Resolves the index directory, preferring `--index-dir`.
    pub fn index_dir(&self, args: &IndexDirArgs) -> PathBuf {
        match &args.index_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.cwd.join(dir),
            None => self.config.index_dir(&self.cwd),
        }
    }

    /// Store options derived from configuration.
    pub fn store_options(&self) -> Result<StoreOptions, ExitCode> {
        StoreOptions::from_config(&self.config).map_err(|e| {
            eprintln!("error: invalid index settings: {e}");
            ExitCode::FAILURE
        })
    }

    /// Opens an existing index.
    pub fn open_store(&self, args: &IndexDirArgs) -> Result<IndexStore, ExitCode> {
        let dir = self.index_dir(args);
        let options = self.store_options()?;
        IndexStore::open(&dir, options).map_err(|e| {
            eprintln!("error: failed to open index: {e}");
            hint_missing_index(&dir);
            ExitCode::FAILURE
        })
    }

    /// Opens the index with `options`, creating it first if needed.
    pub fn open_or_create_store(
        &self,
        args: &IndexDirArgs,
        options: StoreOptions,
    ) -> Result<IndexStore, ExitCode> {
        let dir = self.index_dir(args);
        IndexStore::open_or_create(&dir, options).map_err(|e| {
            eprintln!("error: failed to open index: {e}");
            ExitCode::FAILURE
        })
    }
}

/// Suggests `folio index` when the directory has no index yet.
fn hint_missing_index(dir: &Path) {
    if !dir.exists() {
        eprintln!("Run 'folio index <path>' to build an index first.");
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
