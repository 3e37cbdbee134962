//! Configuration system for folio.
//!
//! folio reads TOML files named `.folio.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory,
//! collecting any `.folio.toml` files found, then loading `~/.folio.toml` as
//! the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod patterns;
mod resolve;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawIndexSettings, RawSearchSettings, parse_config_file, parse_config_str,
};
pub use patterns::ExcludePatterns;
pub use resolve::resolve_config_path;

/// Directory, relative to the config root, that holds the index by default.
pub const DEFAULT_INDEX_DIR: &str = ".folio/index";

/// Fully merged configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Index creation and ingestion settings.
    pub index: IndexSettings,
    /// Query settings.
    pub search: SearchSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.folio.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&discover_config_files(cwd))
    }

    /// Loads configuration from config file paths given highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Returns where the index lives.
    ///
    /// An explicit `[index] dir` wins; otherwise the index sits under the
    /// nearest config root, or under `cwd` when no config was found.
    pub fn index_dir(&self, cwd: &Path) -> PathBuf {
        if let Some(dir) = &self.index.dir {
            return dir.clone();
        }
        self.config_root
            .as_deref()
            .unwrap_or(cwd)
            .join(DEFAULT_INDEX_DIR)
    }

    /// Compiles the configured exclude globs.
    pub fn exclude_patterns(&self) -> Result<ExcludePatterns, ConfigError> {
        ExcludePatterns::compile(&self.index.exclude)
    }
}

/// Index creation and ingestion settings (`[index]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    /// Explicit index directory.
    pub dir: Option<PathBuf>,
    /// Tokenizer kind for new indexes: "default" or "cjk".
    pub tokenizer: String,
    /// Stemming language for the default tokenizer, or "none".
    pub stemmer: String,
    /// Characters kept per page in the stored page blob.
    pub page_text_cap: usize,
    /// Memory budget for the index writer.
    pub writer_heap_bytes: usize,
    /// Files larger than this many bytes are skipped.
    pub max_file_size: u64,
    /// Extensions read by the plain-text extractor.
    pub extensions: Vec<String>,
    /// Glob patterns excluded from discovery.
    pub exclude: Vec<String>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            dir: None,
            tokenizer: String::from("default"),
            stemmer: String::from("none"),
            page_text_cap: 2000,
            writer_heap_bytes: 50_000_000,
            max_file_size: 50 * 1024 * 1024,
            extensions: ["txt", "text", "md", "markdown", "csv", "log", "rst"]
                .into_iter()
                .map(String::from)
                .collect(),
            exclude: Vec::new(),
        }
    }
}

/// Query settings (`[search]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Default number of results.
    pub max_results: usize,
    /// Snippet window in characters.
    pub snippet_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            snippet_chars: 300,
        }
    }
}
