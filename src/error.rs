//! Configuration errors.
//!
//! Only setup can fail: compiling a pattern set or reading its settings.
//! Region queries and expansion never return errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured pattern does not compile (bad syntax or exceeds the
    /// matcher's size limit).
    #[error("pattern `{name}` failed to compile: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// An ignored-rule pattern has no capture group to read rule names from.
    #[error("ignored rule pattern `{pattern}` needs a capture group for rule names")]
    MissingRuleGroup { pattern: String },

    #[error("unknown region kind `{0}`")]
    UnknownRegionKind(String),

    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}
