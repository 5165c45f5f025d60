//! Pattern matching backend and the compiled pattern set.
//!
//! - `Pattern` and `MatchOptions` wrap the regex engine
//! - `PatternSources` is the raw dialect description, `PatternSet` its compiled form

mod matcher;
mod set;

pub use matcher::{MatchOptions, Pattern};
pub use set::{IgnoredRule, PatternSet, PatternSources};
