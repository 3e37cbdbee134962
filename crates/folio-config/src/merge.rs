//! Configuration merging.
//!
//! Folds parsed config files into one `Config`. Scalars take the value from
//! the closest file that defines them.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, IndexSettings, SearchSettings,
    parse::{RawConfig, RawIndexSettings, RawSearchSettings},
    resolve::resolve_config_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges configuration files given in precedence order, highest first.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let mut index = IndexSettings::default();
    let mut search = SearchSettings::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        if let Some(raw) = &parsed.config.index {
            apply_raw_index(&mut index, raw, parsed.dir())?;
        }
        if let Some(raw) = &parsed.config.search {
            apply_raw_search(&mut search, raw);
        }
    }

    Ok(Config {
        index,
        search,
        config_root: configs.first().map(|c| c.dir().to_path_buf()),
    })
}

/// Applies a raw `[index]` section, resolving `dir` against `config_dir`.
fn apply_raw_index(
    result: &mut IndexSettings,
    raw: &RawIndexSettings,
    config_dir: &Path,
) -> Result<(), ConfigError> {
    if let Some(dir) = &raw.dir {
        result.dir = Some(resolve_config_path(dir, config_dir)?);
    }
    if let Some(v) = &raw.tokenizer {
        result.tokenizer.clone_from(v);
    }
    if let Some(v) = &raw.stemmer {
        result.stemmer.clone_from(v);
    }
    if let Some(v) = raw.page_text_cap {
        result.page_text_cap = v;
    }
    if let Some(v) = raw.writer_heap_bytes {
        result.writer_heap_bytes = v;
    }
    if let Some(v) = raw.max_file_size {
        result.max_file_size = v;
    }
    if let Some(v) = &raw.extensions {
        result.extensions.clone_from(v);
    }
    if let Some(v) = &raw.exclude {
        result.exclude.clone_from(v);
    }
    Ok(())
}

/// Applies a raw `[search]` section.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.max_results {
        result.max_results = v;
    }
    if let Some(v) = raw.snippet_chars {
        result.snippet_chars = v;
    }
}
