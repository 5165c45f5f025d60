//! Compiled patterns and the match options they are compiled with.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex, RegexBuilder};

use crate::document::Span;
use crate::error::ConfigError;

/// Flags a pattern is compiled with.
///
/// The named constants mirror the combinations the classifiers need; each
/// letter stands for one flag (I = case-insensitive, M = multi-line,
/// V/X = free-spacing, D = dot matches newline).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MatchOptions {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
}

impl MatchOptions {
    pub const IV: Self = Self {
        case_insensitive: true,
        multi_line: false,
        dot_matches_new_line: false,
        ignore_whitespace: true,
    };
    pub const IMVD: Self = Self {
        case_insensitive: true,
        multi_line: true,
        dot_matches_new_line: true,
        ignore_whitespace: true,
    };
    pub const IVD: Self = Self {
        case_insensitive: true,
        multi_line: false,
        dot_matches_new_line: true,
        ignore_whitespace: true,
    };
    pub const IX: Self = Self::IV;
    pub const IMX: Self = Self {
        case_insensitive: true,
        multi_line: true,
        dot_matches_new_line: false,
        ignore_whitespace: true,
    };
}

impl fmt::Display for MatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, letter) in [
            (self.case_insensitive, 'i'),
            (self.multi_line, 'm'),
            (self.dot_matches_new_line, 's'),
            (self.ignore_whitespace, 'x'),
        ] {
            if set {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// `\b\B` can never hold at one position.
static NEVER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\B").unwrap());

/// A named, precompiled pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    source: String,
    options: MatchOptions,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` with `options`.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        options: MatchOptions,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let source = source.into();
        let regex = RegexBuilder::new(&source)
            .case_insensitive(options.case_insensitive)
            .multi_line(options.multi_line)
            .dot_matches_new_line(options.dot_matches_new_line)
            .ignore_whitespace(options.ignore_whitespace)
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            source,
            options,
            regex,
        })
    }

    /// A pattern that matches nothing, used for region kinds a dialect
    /// leaves undefined.
    pub fn never(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: NEVER.as_str().to_string(),
            options: MatchOptions::default(),
            regex: NEVER.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Number of capture groups, not counting the implicit whole-match group.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Non-overlapping matches, left to right, exactly as the matcher reports them.
    pub fn find_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Span> + 'a {
        self.regex.find_iter(text).map(Span::from)
    }

    pub fn find(&self, text: &str) -> Option<Span> {
        self.regex.find(text).map(Span::from)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn captures_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Captures<'a>> + 'a {
        self.regex.captures_iter(text)
    }

    /// End offset of the last match in `text`, or 0 when nothing matches.
    pub fn last_match_end(&self, text: &str) -> usize {
        self.regex.find_iter(text).last().map_or(0, |m| m.end())
    }

    /// Identity used when fingerprinting a pattern set.
    pub(crate) fn fingerprint(&self) -> String {
        format!("{}/{}/{}", self.name, self.options, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_applied() {
        let pattern = Pattern::new("p", r"<div \s* >", MatchOptions::IV).unwrap();
        assert!(pattern.is_match("<DIV>"));

        let strict = Pattern::new("p", r"<div>", MatchOptions::default()).unwrap();
        assert!(!strict.is_match("<DIV>"));
    }

    #[test]
    fn dot_matches_new_line_only_when_asked() {
        let dotall = Pattern::new("p", r"a.b", MatchOptions::IVD).unwrap();
        let plain = Pattern::new("p", r"a.b", MatchOptions::IV).unwrap();
        assert!(dotall.is_match("a\nb"));
        assert!(!plain.is_match("a\nb"));
    }

    #[test]
    fn invalid_pattern_reports_name() {
        let err = Pattern::new("ignored_blocks", r"(unclosed", MatchOptions::IV).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref name, .. } if name == "ignored_blocks"));
        assert!(err.to_string().contains("ignored_blocks"));
    }

    #[test]
    fn never_matches_nothing() {
        let never = Pattern::never("unused");
        assert!(!never.is_match(""));
        assert!(!never.is_match("anything\nat all"));
        assert_eq!(never.find_iter("abc").count(), 0);
    }

    #[test]
    fn find_iter_is_ordered_and_non_overlapping() {
        let pattern = Pattern::new("p", r"aa", MatchOptions::IV).unwrap();
        let spans: Vec<_> = pattern.find_iter("aaaaa").collect();
        assert_eq!(spans, vec![Span::new(0, 2), Span::new(2, 4)]);
        assert_eq!(pattern.last_match_end("aaaaa"), 4);
        assert_eq!(pattern.last_match_end("b"), 0);
    }

    #[test]
    fn options_display() {
        assert_eq!(MatchOptions::IMVD.to_string(), "imsx");
        assert_eq!(MatchOptions::IV.to_string(), "ix");
    }
}
