//! Protected region kinds and the per-document index of their spans.
//!
//! A position may sit inside spans of several kinds at once. The index only
//! records where each kind's pattern matched; deciding which kind wins is
//! left to the queries built on top of it.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::ConfigError;
use crate::patterns::PatternSet;

use super::text::Span;

/// Why a span of the document is protected from reformatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Content emitted verbatim (raw/verbatim blocks, comments).
    IgnoredBlock,
    /// Single-line ignored constructs.
    IgnoredInlineBlock,
    /// Exempt from indentation but not from line splitting.
    UnformattedBlock,
    /// Delimited by template syntax rather than HTML syntax.
    TemplateBlock,
    /// Sections the linter must skip.
    IgnoredLinterBlock,
    /// Translation block; `trimmed` blocks may be reflowed.
    TransBlock { trimmed: bool },
    /// Embedded script or style body.
    ScriptStyleBlock,
}

impl RegionKind {
    pub const ALL: [RegionKind; 8] = [
        RegionKind::IgnoredBlock,
        RegionKind::IgnoredInlineBlock,
        RegionKind::UnformattedBlock,
        RegionKind::TemplateBlock,
        RegionKind::IgnoredLinterBlock,
        RegionKind::TransBlock { trimmed: false },
        RegionKind::TransBlock { trimmed: true },
        RegionKind::ScriptStyleBlock,
    ];

    /// Any ignored region: block spans first, then inline spans.
    pub const ANY_IGNORED: &'static [RegionKind] =
        &[RegionKind::IgnoredBlock, RegionKind::IgnoredInlineBlock];

    pub fn name(self) -> &'static str {
        match self {
            RegionKind::IgnoredBlock => "ignored_block",
            RegionKind::IgnoredInlineBlock => "ignored_inline_block",
            RegionKind::UnformattedBlock => "unformatted_block",
            RegionKind::TemplateBlock => "template_block",
            RegionKind::IgnoredLinterBlock => "ignored_linter_block",
            RegionKind::TransBlock { trimmed: false } => "trans_block",
            RegionKind::TransBlock { trimmed: true } => "trans_trimmed_block",
            RegionKind::ScriptStyleBlock => "script_style_block",
        }
    }

    fn slot(self) -> usize {
        match self {
            RegionKind::IgnoredBlock => 0,
            RegionKind::IgnoredInlineBlock => 1,
            RegionKind::UnformattedBlock => 2,
            RegionKind::TemplateBlock => 3,
            RegionKind::IgnoredLinterBlock => 4,
            RegionKind::TransBlock { trimmed: false } => 5,
            RegionKind::TransBlock { trimmed: true } => 6,
            RegionKind::ScriptStyleBlock => 7,
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegionKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        RegionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ConfigError::UnknownRegionKind(name.to_string()))
    }
}

/// An ignored-rule match and the rule names it suppresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    pub span: Span,
    /// Empty means every rule is suppressed.
    pub rules: Vec<String>,
}

impl Suppression {
    /// Parse the free-text rule list captured by an ignored-rule pattern.
    /// Names are separated by whitespace or commas.
    pub fn new(span: Span, rule_list: &str) -> Self {
        let rules = rule_list
            .trim()
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self { span, rules }
    }

    pub fn suppresses_all(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self, rule: &str) -> bool {
        self.rules.iter().any(|name| name == rule)
    }
}

/// Lazily computed spans of every region kind for one
/// (document content, pattern set) pair.
///
/// Each slot is filled at most once and never changes afterwards. The index
/// does not hold the document; the cache key ties it to one.
#[derive(Debug, Default)]
pub(crate) struct RegionIndex {
    slots: [OnceLock<Vec<Span>>; 8],
    suppressions: OnceLock<Vec<Suppression>>,
}

impl RegionIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Spans of `kind` in matcher order.
    pub(crate) fn spans(&self, patterns: &PatternSet, document: &str, kind: RegionKind) -> &[Span] {
        self.slots[kind.slot()].get_or_init(|| {
            let spans: Vec<Span> = patterns.region_pattern(kind).find_iter(document).collect();
            tracing::trace!(%kind, count = spans.len(), "indexed region spans");
            spans
        })
    }

    pub(crate) fn suppressions(&self, patterns: &PatternSet, document: &str) -> &[Suppression] {
        self.suppressions.get_or_init(|| {
            patterns
                .ignored_rules()
                .iter()
                .flat_map(|rule| rule.pattern().captures_iter(document))
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let list = caps.get(1).map_or("", |m| m.as_str());
                    Some(Suppression::new(whole.into(), list))
                })
                .collect()
        })
    }

    /// Whether `kind` has been computed yet.
    pub(crate) fn is_indexed(&self, kind: RegionKind) -> bool {
        self.slots[kind.slot()].get().is_some()
    }
}
