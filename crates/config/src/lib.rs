//! Crobot Loader Configuration
//!
//! Reads level loader settings from a `levels.cfg` options file.
//!
//! ```text
//! # where bundled assets live
//! assetsroot = assets
//! levelsdir = levels
//! maxcachedlevels = 16
//! ```

use crobot_core::{CoreError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default asset root directory
pub const DEFAULT_ASSETS_ROOT: &str = "assets";

/// Default directory (relative to the asset root) holding level files
pub const DEFAULT_LEVELS_DIR: &str = "levels";

/// Default number of decoded levels kept by the cache
pub const DEFAULT_MAX_CACHED_LEVELS: usize = 16;

/// Level loader configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Root directory that asset paths are resolved against (from "assetsroot")
    pub assets_root: PathBuf,
    /// Level directory prefix inside the asset root (from "levelsdir")
    pub levels_dir: String,
    /// Cache capacity in levels (from "maxcachedlevels")
    pub max_cached_levels: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from(DEFAULT_ASSETS_ROOT),
            levels_dir: DEFAULT_LEVELS_DIR.into(),
            max_cached_levels: DEFAULT_MAX_CACHED_LEVELS,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from an options file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content);
        tracing::debug!(
            path = %path.display(),
            assets_root = %config.assets_root.display(),
            levels_dir = %config.levels_dir,
            max_cached_levels = config.max_cached_levels,
            "loaded loader config"
        );
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using default loader config", e);
                Self::default()
            }
        }
    }

    /// Parse options file content
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();

                config.parse_option(key, value);
            }
        }

        config
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key.to_lowercase().as_str() {
            "assetsroot" => self.assets_root = PathBuf::from(value),
            "levelsdir" => {
                let trimmed = value.trim_matches('/');
                self.levels_dir = if trimmed.is_empty() {
                    DEFAULT_LEVELS_DIR.into()
                } else {
                    trimmed.into()
                };
            }
            "maxcachedlevels" => {
                self.max_cached_levels = value.parse().unwrap_or(DEFAULT_MAX_CACHED_LEVELS);
            }
            other => {
                tracing::trace!(key = other, "ignoring unknown loader option");
            }
        }
    }
}
