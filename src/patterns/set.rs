//! The compiled pattern set a formatting pass classifies against.
//!
//! Pattern text belongs to the templating dialect and arrives through
//! [`PatternSources`]; this module only compiles it with the options each
//! consumer needs. Some sources are compiled twice under different options
//! because different classifiers read them differently.

use std::sync::Arc;

use serde::Deserialize;

use crate::document::RegionKind;
use crate::error::ConfigError;

use super::matcher::{MatchOptions, Pattern};

/// Raw, dialect-specific pattern text. Unset region patterns never match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatternSources {
    pub ignored_blocks: Option<String>,
    pub ignored_inline_blocks: Option<String>,
    /// Same-fragment open+close form of an ignored block.
    pub ignored_blocks_inline: Option<String>,
    pub ignored_block_opening: Option<String>,
    pub ignored_block_closing: Option<String>,

    pub unformatted_blocks: Option<String>,
    pub template_blocks: Option<String>,
    pub ignored_linter_blocks: Option<String>,

    pub script_style_blocks: Option<String>,
    pub script_style_inline: Option<String>,
    pub script_style_opening: Option<String>,
    pub script_style_closing: Option<String>,

    /// Non-trimmed translation blocks.
    pub ignored_trans_blocks: Option<String>,
    pub ignored_trans_blocks_closing: Option<String>,
    pub trans_trimmed_blocks: Option<String>,

    pub safe_closing_tag: Option<String>,

    pub break_before_html: Option<String>,
    pub break_after_html: Option<String>,
    pub break_before_template: Option<String>,
    pub break_after_template: Option<String>,

    /// HTML tag names whose start tags may carry template tags in attributes.
    pub indent_html_tags: Vec<String>,

    /// Ignored-rule patterns. Group 1 captures the suppressed rule names.
    pub ignored_rules: Vec<String>,

    /// Region kinds that block line breaks during expansion.
    /// Defaults to ignored blocks and ignored inline blocks.
    pub protected_regions: Option<Vec<String>>,
}

/// A compiled ignored-rule pattern.
#[derive(Debug, Clone)]
pub struct IgnoredRule {
    pattern: Pattern,
}

impl IgnoredRule {
    fn compile(index: usize, source: &str) -> Result<Self, ConfigError> {
        let pattern = Pattern::new(format!("ignored_rules[{index}]"), source, MatchOptions::IVD)?;
        if pattern.group_count() == 0 {
            return Err(ConfigError::MissingRuleGroup {
                pattern: source.to_string(),
            });
        }
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// Every pattern the classifiers and the expansion engine consume, one
/// accessor per pattern and option combination.
#[derive(Debug, Clone)]
pub struct PatternSet {
    ignored_blocks: Pattern,
    ignored_inline_blocks: Pattern,
    ignored_blocks_inline: Pattern,
    ignored_block_opening: Pattern,
    ignored_block_closing: Pattern,
    unformatted_blocks: Pattern,
    template_blocks: Pattern,
    ignored_linter_blocks: Pattern,
    script_style_blocks: Pattern,
    script_style_inline: Pattern,
    script_style_inline_closing: Pattern,
    script_style_opening: Pattern,
    script_style_closing: Pattern,
    ignored_trans_blocks: Pattern,
    ignored_trans_blocks_closing: Pattern,
    trans_trimmed_blocks: Pattern,
    safe_closing_tag: Pattern,
    safe_closing_prefix: Pattern,
    break_before_html: Pattern,
    break_after_html: Pattern,
    break_before_template: Pattern,
    break_after_template: Pattern,
    html_attribute_scan: Pattern,
    ignored_rules: Vec<IgnoredRule>,
    protected_regions: Vec<RegionKind>,
    fingerprint: Arc<str>,
}

/// Compile an optional source, falling back to a pattern that never matches.
fn compile(
    name: &str,
    source: &Option<String>,
    options: MatchOptions,
) -> Result<Pattern, ConfigError> {
    match source.as_deref() {
        Some(source) if !source.trim().is_empty() => Pattern::new(name, source, options),
        _ => Ok(Pattern::never(name)),
    }
}

/// Text that may sit between an HTML start tag's name and a template tag
/// inside its attribute area: quoted values without `>`, other template
/// tags, comments, and anything that is not a bracket.
const ATTRIBUTE_CONTENT: &str =
    r#"(?:"[^">]*"|'[^'>]*'|\{\{[^}]*\}\}|\{%[^%]*%\}|\{\#[^\#]*\#\}|[^>{}])*"#;

fn attribute_scan(tags: &[String]) -> Result<Pattern, ConfigError> {
    let names: Vec<String> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();

    if names.is_empty() {
        tracing::warn!("no indent html tags configured; template tags in attributes may be split");
        return Ok(Pattern::never("html_attribute_scan"));
    }

    let source = format!(r"<(?:{})\b{}\z", names.join("|"), ATTRIBUTE_CONTENT);
    Pattern::new("html_attribute_scan", source, MatchOptions::IMX)
}

/// `inline | blocks`, so a safe closing tag is looked for only after every
/// ignored construct in the fragment.
fn safe_closing_prefix(sources: &PatternSources) -> Result<Pattern, ConfigError> {
    let parts: Vec<String> = [&sources.ignored_inline_blocks, &sources.ignored_blocks]
        .into_iter()
        .filter_map(|s| s.as_deref())
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!("(?:{s})"))
        .collect();

    if parts.is_empty() {
        return Ok(Pattern::never("safe_closing_prefix"));
    }
    Pattern::new("safe_closing_prefix", parts.join(" | "), MatchOptions::IMVD)
}

impl PatternSet {
    /// Compile every source. Fails on the first pattern that does not compile.
    pub fn compile(sources: &PatternSources) -> Result<Self, ConfigError> {
        use MatchOptions as O;

        let ignored_rules = sources
            .ignored_rules
            .iter()
            .enumerate()
            .map(|(i, source)| IgnoredRule::compile(i, source))
            .collect::<Result<Vec<_>, _>>()?;

        let protected_regions = match &sources.protected_regions {
            Some(names) => names
                .iter()
                .map(|name| name.parse())
                .collect::<Result<Vec<RegionKind>, _>>()?,
            None => RegionKind::ANY_IGNORED.to_vec(),
        };

        let mut set = Self {
            ignored_blocks: compile("ignored_blocks", &sources.ignored_blocks, O::IMVD)?,
            ignored_inline_blocks: compile(
                "ignored_inline_blocks",
                &sources.ignored_inline_blocks,
                O::IV,
            )?,
            ignored_blocks_inline: compile(
                "ignored_blocks_inline",
                &sources.ignored_blocks_inline,
                O::IMVD,
            )?,
            ignored_block_opening: compile(
                "ignored_block_opening",
                &sources.ignored_block_opening,
                O::IV,
            )?,
            ignored_block_closing: compile(
                "ignored_block_closing",
                &sources.ignored_block_closing,
                O::IV,
            )?,
            unformatted_blocks: compile("unformatted_blocks", &sources.unformatted_blocks, O::IMVD)?,
            template_blocks: compile("template_blocks", &sources.template_blocks, O::IMVD)?,
            ignored_linter_blocks: compile(
                "ignored_linter_blocks",
                &sources.ignored_linter_blocks,
                O::IMVD,
            )?,
            script_style_blocks: compile(
                "script_style_blocks",
                &sources.script_style_blocks,
                O::IMVD,
            )?,
            script_style_inline: compile(
                "script_style_inline",
                &sources.script_style_inline,
                O::IMVD,
            )?,
            script_style_inline_closing: compile(
                "script_style_inline_closing",
                &sources.script_style_inline,
                O::IV,
            )?,
            script_style_opening: compile(
                "script_style_opening",
                &sources.script_style_opening,
                O::IV,
            )?,
            script_style_closing: compile(
                "script_style_closing",
                &sources.script_style_closing,
                O::IV,
            )?,
            ignored_trans_blocks: compile(
                "ignored_trans_blocks",
                &sources.ignored_trans_blocks,
                O::IVD,
            )?,
            ignored_trans_blocks_closing: compile(
                "ignored_trans_blocks_closing",
                &sources.ignored_trans_blocks_closing,
                O::IV,
            )?,
            trans_trimmed_blocks: compile(
                "trans_trimmed_blocks",
                &sources.trans_trimmed_blocks,
                O::IVD,
            )?,
            safe_closing_tag: compile("safe_closing_tag", &sources.safe_closing_tag, O::IV)?,
            safe_closing_prefix: safe_closing_prefix(sources)?,
            break_before_html: compile("break_before_html", &sources.break_before_html, O::IX)?,
            break_after_html: compile("break_after_html", &sources.break_after_html, O::IX)?,
            break_before_template: compile(
                "break_before_template",
                &sources.break_before_template,
                O::IMX,
            )?,
            break_after_template: compile(
                "break_after_template",
                &sources.break_after_template,
                O::IMX,
            )?,
            html_attribute_scan: attribute_scan(&sources.indent_html_tags)?,
            ignored_rules,
            protected_regions,
            fingerprint: Arc::from(""),
        };
        set.fingerprint = set.compute_fingerprint();

        tracing::debug!(
            rules = set.ignored_rules.len(),
            protected = ?set.protected_regions,
            "compiled pattern set"
        );
        Ok(set)
    }

    fn compute_fingerprint(&self) -> Arc<str> {
        let patterns = [
            &self.ignored_blocks,
            &self.ignored_inline_blocks,
            &self.ignored_blocks_inline,
            &self.ignored_block_opening,
            &self.ignored_block_closing,
            &self.unformatted_blocks,
            &self.template_blocks,
            &self.ignored_linter_blocks,
            &self.script_style_blocks,
            &self.script_style_inline,
            &self.script_style_inline_closing,
            &self.script_style_opening,
            &self.script_style_closing,
            &self.ignored_trans_blocks,
            &self.ignored_trans_blocks_closing,
            &self.trans_trimmed_blocks,
            &self.safe_closing_tag,
            &self.safe_closing_prefix,
            &self.break_before_html,
            &self.break_after_html,
            &self.break_before_template,
            &self.break_after_template,
            &self.html_attribute_scan,
        ];

        let mut parts: Vec<String> = patterns.iter().map(|p| p.fingerprint()).collect();
        parts.extend(self.ignored_rules.iter().map(|r| r.pattern.fingerprint()));
        parts.extend(self.protected_regions.iter().map(|k| k.name().to_string()));
        Arc::from(parts.join("\u{0}"))
    }

    /// The pattern that produces spans for `kind`.
    pub fn region_pattern(&self, kind: RegionKind) -> &Pattern {
        match kind {
            RegionKind::IgnoredBlock => &self.ignored_blocks,
            RegionKind::IgnoredInlineBlock => &self.ignored_inline_blocks,
            RegionKind::UnformattedBlock => &self.unformatted_blocks,
            RegionKind::TemplateBlock => &self.template_blocks,
            RegionKind::IgnoredLinterBlock => &self.ignored_linter_blocks,
            RegionKind::TransBlock { trimmed: false } => &self.ignored_trans_blocks,
            RegionKind::TransBlock { trimmed: true } => &self.trans_trimmed_blocks,
            RegionKind::ScriptStyleBlock => &self.script_style_blocks,
        }
    }

    /// Identity of this set, covering every source, option, rule and
    /// protected kind. Used as the pattern half of cache keys.
    pub fn fingerprint(&self) -> &Arc<str> {
        &self.fingerprint
    }

    pub fn ignored_inline_blocks(&self) -> &Pattern {
        &self.ignored_inline_blocks
    }

    pub fn ignored_blocks_inline(&self) -> &Pattern {
        &self.ignored_blocks_inline
    }

    pub fn ignored_block_opening(&self) -> &Pattern {
        &self.ignored_block_opening
    }

    pub fn ignored_block_closing(&self) -> &Pattern {
        &self.ignored_block_closing
    }

    /// Multi-line form, read when looking for an opening delimiter.
    pub fn script_style_inline(&self) -> &Pattern {
        &self.script_style_inline
    }

    /// Single-line form, read when looking for a closing delimiter.
    pub fn script_style_inline_closing(&self) -> &Pattern {
        &self.script_style_inline_closing
    }

    pub fn script_style_opening(&self) -> &Pattern {
        &self.script_style_opening
    }

    pub fn script_style_closing(&self) -> &Pattern {
        &self.script_style_closing
    }

    pub fn ignored_trans_blocks(&self) -> &Pattern {
        &self.ignored_trans_blocks
    }

    pub fn ignored_trans_blocks_closing(&self) -> &Pattern {
        &self.ignored_trans_blocks_closing
    }

    pub fn safe_closing_tag(&self) -> &Pattern {
        &self.safe_closing_tag
    }

    pub fn safe_closing_prefix(&self) -> &Pattern {
        &self.safe_closing_prefix
    }

    pub fn break_before_html(&self) -> &Pattern {
        &self.break_before_html
    }

    pub fn break_after_html(&self) -> &Pattern {
        &self.break_after_html
    }

    pub fn break_before_template(&self) -> &Pattern {
        &self.break_before_template
    }

    pub fn break_after_template(&self) -> &Pattern {
        &self.break_after_template
    }

    /// Matches when the searched text ends inside the attribute area of an
    /// indent-relevant HTML start tag.
    pub fn html_attribute_scan(&self) -> &Pattern {
        &self.html_attribute_scan
    }

    pub fn ignored_rules(&self) -> &[IgnoredRule] {
        &self.ignored_rules
    }

    /// Region kinds that suppress line breaks during expansion.
    pub fn protected_regions(&self) -> &[RegionKind] {
        &self.protected_regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sources_compile() {
        let set = PatternSet::compile(&PatternSources::default()).unwrap();
        assert!(!set.region_pattern(RegionKind::IgnoredBlock).is_match("<!-- x -->"));
        assert_eq!(set.protected_regions(), RegionKind::ANY_IGNORED);
        assert!(set.ignored_rules().is_empty());
    }

    #[test]
    fn bad_pattern_is_reported_by_name() {
        let err = PatternSet::compile(&PatternSources {
            template_blocks: Some(r"{%\s*(block".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidPattern { ref name, .. } if name == "template_blocks")
        );
    }

    #[test]
    fn ignored_rule_needs_capture_group() {
        let err = PatternSet::compile(&PatternSources {
            ignored_rules: vec![r"<!--\s*djlint:off\s*-->".into()],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRuleGroup { .. }));
    }

    #[test]
    fn protected_regions_parse() {
        let set = PatternSet::compile(&PatternSources {
            protected_regions: Some(vec!["ignored_block".into(), "unformatted_block".into()]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            set.protected_regions(),
            &[RegionKind::IgnoredBlock, RegionKind::UnformattedBlock]
        );

        let err = PatternSet::compile(&PatternSources {
            protected_regions: Some(vec!["nonsense".into()]),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRegionKind(_)));
    }

    #[test]
    fn script_style_inline_forms_are_named_apart() {
        let set = PatternSet::compile(&PatternSources {
            script_style_inline: Some(r"<(script|style)\b[^>]*>.*?</(script|style)>".into()),
            ..Default::default()
        })
        .unwrap();
        let multi_line = set.script_style_inline();
        let closing = set.script_style_inline_closing();
        assert_eq!(multi_line.name(), "script_style_inline");
        assert_eq!(closing.name(), "script_style_inline_closing");
        assert_eq!(multi_line.source(), closing.source());
        assert_ne!(multi_line.fingerprint(), closing.fingerprint());
    }

    #[test]
    fn fingerprint_tracks_sources() {
        let a = PatternSet::compile(&PatternSources {
            ignored_blocks: Some("<pre>.*?</pre>".into()),
            ..Default::default()
        })
        .unwrap();
        let b = PatternSet::compile(&PatternSources {
            ignored_blocks: Some("<textarea>.*?</textarea>".into()),
            ..Default::default()
        })
        .unwrap();
        let a_again = PatternSet::compile(&PatternSources {
            ignored_blocks: Some("<pre>.*?</pre>".into()),
            ..Default::default()
        })
        .unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), a_again.fingerprint());
    }

    #[test]
    fn attribute_scan_requires_enclosing_start_tag() {
        let set = PatternSet::compile(&PatternSources {
            indent_html_tags: vec!["div".into(), "a".into()],
            ..Default::default()
        })
        .unwrap();
        let scan = set.html_attribute_scan();
        assert!(scan.is_match(r#"<div class=""#));
        assert!(scan.is_match(r#"<div data-x="{{ y }}" class="#));
        assert!(!scan.is_match(r#"<div class="x">"#));
        assert!(!scan.is_match("<span "));
        // `<divider` is not a `div`
        assert!(!scan.is_match("<divider "));
    }

    #[test]
    fn safe_closing_prefix_joins_both_ignored_forms() {
        let set = PatternSet::compile(&PatternSources {
            ignored_blocks: Some(r"<pre>.*?</pre>".into()),
            ignored_inline_blocks: Some(r"<!--.*?-->".into()),
            ..Default::default()
        })
        .unwrap();
        let prefix = set.safe_closing_prefix();
        assert!(prefix.is_match("<pre>\n</pre>"));
        assert!(prefix.is_match("<!-- x -->"));
    }
}
