//! Region classification and tag line-expansion for HTML/template formatters.
//!
//! Given a document mixing HTML with template tag syntax and a compiled
//! [`PatternSet`] describing the dialect, this crate answers whether a match
//! position lies inside a region that must not be reformatted, and splits the
//! document into lines around HTML and template tags wherever that is safe.
//!
//! ```ignore
//! use markup_expand::{build_pattern_set, expand_html, load_settings, RegionCache};
//!
//! let settings = load_settings(Path::new("django.toml"))?;
//! let patterns = build_pattern_set(&settings)?;
//! let cache = RegionCache::new();
//! let expanded = expand_html(source, &patterns, &cache);
//! ```

mod classify;
mod document;
mod error;
mod expand;
pub mod patterns;
pub(crate) mod settings;

pub use classify::{is_block_closing, is_block_opening, is_safe_closing_tag, DelimitedBlock};
pub use document::{
    DocumentRegions, RegionCache, RegionKind, Span, Suppression, DEFAULT_MAX_ENTRIES,
};
pub use error::ConfigError;
pub use expand::expand_html;
pub use patterns::{MatchOptions, Pattern, PatternSet, PatternSources};
pub use settings::{build_cache, build_pattern_set, load_settings, CacheSettings, Settings};
