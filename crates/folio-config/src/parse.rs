//! Configuration file parsing.
//!
//! Parses individual `.folio.toml` files into `RawConfig` structures where
//! every field is optional, so partial files can be merged.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// Index settings section.
    pub index: Option<RawIndexSettings>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
}

/// Raw `[index]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawIndexSettings {
    /// Index directory, relative to the config file.
    pub dir: Option<String>,
    /// Tokenizer kind used when creating a new index.
    pub tokenizer: Option<String>,
    /// Stemming language, or "none".
    pub stemmer: Option<String>,
    /// Per-page character cap for the stored page blob.
    pub page_text_cap: Option<usize>,
    /// Writer memory budget in bytes.
    pub writer_heap_bytes: Option<usize>,
    /// Files larger than this are skipped during discovery.
    pub max_file_size: Option<u64>,
    /// File extensions handled by the plain-text extractor.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub extensions: Option<Vec<String>>,
    /// Glob patterns excluded from discovery.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub exclude: Option<Vec<String>>,
}

/// Raw `[search]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSearchSettings {
    /// Default number of results.
    pub max_results: Option<usize>,
    /// Snippet window in characters.
    pub snippet_chars: Option<usize>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string. `path` is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Unreadable or invalid files count as non-root; the error surfaces later
/// when the file is actually loaded.
pub fn is_root_config(path: &Path) -> bool {
    parse_config_file(path).is_ok_and(|config| config.root == Some(true))
}
