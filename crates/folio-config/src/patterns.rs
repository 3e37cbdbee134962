//! Exclude pattern compilation and matching.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::ConfigError;

/// Compiled exclude globs, matched against paths relative to the scan root.
#[derive(Debug, Clone)]
pub struct ExcludePatterns {
    /// The compiled set; empty when nothing is excluded.
    set: GlobSet,
}

impl ExcludePatterns {
    /// Compiles the given glob patterns.
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| ConfigError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self { set })
    }

    /// Returns true if the path matches any exclude pattern.
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.set.is_match(relative_path)
    }
}

impl Default for ExcludePatterns {
    fn default() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }
}
