//! Settings infrastructure.
//!
//! A dialect is described by a TOML document: a `[patterns]` table holding
//! the pattern text for every region kind and tag family, plus optional
//! cache limits. This module parses that document and compiles it.
//!
//! ```toml
//! [patterns]
//! ignored_blocks = '<pre\b.*?</pre>'
//! break_before_html = '(<(?:div|p)\b[^>]*>)'
//! indent_html_tags = ["div", "p"]
//!
//! [cache]
//! max_entries = 64
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::document::RegionCache;
use crate::error::ConfigError;
use crate::patterns::{PatternSet, PatternSources};

/// Root settings structure.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Pattern text for the dialect.
    #[serde(default)]
    pub patterns: PatternSources,

    /// Region cache configuration.
    pub cache: Option<CacheSettings>,
}

/// Region cache settings.
#[derive(Debug, Default, Deserialize)]
pub struct CacheSettings {
    /// Entry cap; the cache empties itself when it would grow past this.
    pub max_entries: Option<usize>,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = Settings::from_toml_str(&content)?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Compile the pattern set described by `settings`.
pub fn build_pattern_set(settings: &Settings) -> Result<PatternSet, ConfigError> {
    PatternSet::compile(&settings.patterns)
}

/// Build a region cache honouring the configured limits, or the default cap.
pub fn build_cache(settings: &Settings) -> RegionCache {
    match settings.cache.as_ref().and_then(|c| c.max_entries) {
        Some(max) => RegionCache::with_max_entries(max),
        None => RegionCache::new(),
    }
}
