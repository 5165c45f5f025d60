//! Containment queries against indexed regions.
//!
//! Three tolerances exist because real markup is often malformed:
//! `inside` accepts shared boundaries, `strictly_inside` rejects a shared
//! start (the block's own opening delimiter), and `overlaps` accepts any
//! partial overlap. When in doubt a span is treated as protected.

use crate::document::{DocumentRegions, RegionKind, Span};

impl DocumentRegions<'_> {
    /// Some span of `kinds` encloses `span`, boundaries inclusive.
    pub fn inside(&self, kinds: &[RegionKind], span: Span) -> bool {
        self.spans_of(kinds).any(|region| region.encloses(span))
    }

    /// Like [`inside`](Self::inside), but a candidate starting exactly
    /// where the region starts is not inside it.
    pub fn strictly_inside(&self, kinds: &[RegionKind], span: Span) -> bool {
        self.spans_of(kinds).any(|region| region.strictly_encloses(span))
    }

    /// The candidate's start or end falls within some region of `kinds`.
    pub fn overlaps(&self, kinds: &[RegionKind], span: Span) -> bool {
        self.spans_of(kinds).any(|region| region.touches(span))
    }

    /// Whether linter rule `rule` is suppressed at `span`.
    ///
    /// A suppression naming `rule` covers candidates that start within it.
    /// A suppression naming no rules covers everything, but only for
    /// candidates that end within it.
    pub fn inside_rule(&self, rule: &str, span: Span) -> bool {
        self.index
            .suppressions(self.patterns, self.document)
            .iter()
            .any(|s| {
                (s.names(rule) && s.span.contains_offset(span.start))
                    || (s.suppresses_all() && s.span.contains_offset(span.end))
            })
    }

    pub fn inside_ignored_block(&self, span: Span) -> bool {
        self.inside(RegionKind::ANY_IGNORED, span)
    }

    pub fn child_of_ignored_block(&self, span: Span) -> bool {
        self.strictly_inside(RegionKind::ANY_IGNORED, span)
    }

    /// Poorly built html may straddle an ignored block; any overlap counts.
    pub fn overlaps_ignored_block(&self, span: Span) -> bool {
        self.overlaps(RegionKind::ANY_IGNORED, span)
    }

    pub fn child_of_unformatted_block(&self, span: Span) -> bool {
        self.strictly_inside(&[RegionKind::UnformattedBlock], span)
    }

    pub fn inside_template_block(&self, span: Span) -> bool {
        self.inside(&[RegionKind::TemplateBlock], span)
    }

    pub fn inside_ignored_linter_block(&self, span: Span) -> bool {
        self.inside(&[RegionKind::IgnoredLinterBlock], span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RegionCache;
    use crate::patterns::{PatternSet, PatternSources};

    fn patterns() -> PatternSet {
        PatternSet::compile(&PatternSources {
            ignored_blocks: Some(r"\{%\s*raw\s*%\}.*?\{%\s*endraw\s*%\}".into()),
            ignored_inline_blocks: Some(r"<!--.*?-->".into()),
            unformatted_blocks: Some(r"<pre\b.*?</pre>".into()),
            template_blocks: Some(r"\{%\s*block\b.*?%\}.*?\{%\s*endblock\s*%\}".into()),
            ignored_linter_blocks: Some(r"\{\#\s*lint:off\s*\#\}.*?\{\#\s*lint:on\s*\#\}".into()),
            ignored_rules: vec![r"\{\#\s*ignore:([\w,\s]*)\#\}.*?\{\#\s*endignore\s*\#\}".into()],
            ..Default::default()
        })
        .unwrap()
    }

    fn find(doc: &str, needle: &str) -> Span {
        let start = doc.find(needle).unwrap();
        Span::new(start, start + needle.len())
    }

    #[test]
    fn exact_bounds_are_inside_but_not_strictly() {
        let patterns = patterns();
        let doc = "<p>{% raw %}<b>{% endraw %}</p>";
        let regions = DocumentRegions::new(&patterns, doc);
        let block = find(doc, "{% raw %}<b>{% endraw %}");

        assert!(regions.inside(&[RegionKind::IgnoredBlock], block));
        assert!(!regions.strictly_inside(&[RegionKind::IgnoredBlock], block));
        assert!(regions.strictly_inside(&[RegionKind::IgnoredBlock], find(doc, "<b>")));
        assert!(!regions.inside_ignored_block(find(doc, "<p>")));
    }

    #[test]
    fn inline_block_inside_outer_block_is_its_own_kind() {
        let patterns = patterns();
        let doc = "{% raw %}<div><!-- note --></div>{% endraw %}<span><!-- x --></span>";
        let regions = DocumentRegions::new(&patterns, doc);
        let inner = find(doc, "<!-- x -->");

        assert!(regions.inside(&[RegionKind::IgnoredInlineBlock], inner));
        assert!(!regions.inside(&[RegionKind::IgnoredBlock], inner));
        assert!(regions.inside_ignored_block(inner));
    }

    #[test]
    fn overlaps_counts_partial_spans() {
        let patterns = patterns();
        let doc = "<div><!-- a --></div>";
        let regions = DocumentRegions::new(&patterns, doc);
        let comment = find(doc, "<!-- a -->");

        // starts before the comment, ends inside it
        let straddling = Span::new(0, comment.start + 3);
        assert!(!regions.inside_ignored_block(straddling));
        assert!(regions.overlaps_ignored_block(straddling));
        // ends exactly where the comment starts: inclusive boundary
        assert!(regions.overlaps_ignored_block(Span::new(0, comment.start)));
        assert!(!regions.overlaps_ignored_block(Span::new(0, comment.start - 1)));
    }

    #[test]
    fn unformatted_children_exclude_the_opening_tag() {
        let patterns = patterns();
        let doc = "<pre>\n  <b>x</b>\n</pre>";
        let regions = DocumentRegions::new(&patterns, doc);

        assert!(!regions.child_of_unformatted_block(find(doc, "<pre>")));
        assert!(regions.child_of_unformatted_block(find(doc, "<b>")));
    }

    #[test]
    fn template_and_linter_blocks() {
        let patterns = patterns();
        let doc = "{% block a %}<i>{% endblock %}{# lint:off #}<u>{# lint:on #}<s>";
        let regions = DocumentRegions::new(&patterns, doc);

        assert!(regions.inside_template_block(find(doc, "<i>")));
        assert!(!regions.inside_template_block(find(doc, "<u>")));
        assert!(regions.inside_ignored_linter_block(find(doc, "<u>")));
        assert!(!regions.inside_ignored_linter_block(find(doc, "<s>")));
    }

    #[test]
    fn named_rule_suppression_uses_start() {
        let patterns = patterns();
        let doc = "<a>{# ignore:H006, H013 #}<img>{# endignore #}\n<img>";
        let regions = DocumentRegions::new(&patterns, doc);
        let first = find(doc, "<img>");
        let second = Span::new(doc.rfind("<img>").unwrap(), doc.len());

        assert!(regions.inside_rule("H006", first));
        assert!(regions.inside_rule("H013", first));
        assert!(!regions.inside_rule("H005", first));
        assert!(!regions.inside_rule("H006", second));
    }

    #[test]
    fn empty_rule_list_suppresses_all_by_end() {
        let patterns = patterns();
        let doc = "<a>{# ignore: #}<img>{# endignore #}";
        let regions = DocumentRegions::new(&patterns, doc);
        let block_start = doc.find("{#").unwrap();

        assert!(regions.inside_rule("anything", find(doc, "<img>")));
        // starts before the suppression but ends inside it
        assert!(regions.inside_rule("H006", Span::new(0, block_start + 2)));
        // ends before it
        assert!(!regions.inside_rule("H006", Span::new(0, block_start - 1)));
    }

    #[test]
    fn repeated_queries_are_stable() {
        let patterns = patterns();
        let cache = RegionCache::new();
        let doc = "{% raw %}<b>{% endraw %}<i>";
        let span = find(doc, "<b>");

        let first = cache.regions(&patterns, doc);
        let a = first.inside_ignored_block(span);
        let spans = first.spans(RegionKind::IgnoredBlock).to_vec();

        let second = cache.regions(&patterns, doc);
        assert_eq!(second.inside_ignored_block(span), a);
        assert_eq!(second.spans(RegionKind::IgnoredBlock), spans.as_slice());
        assert!(a);
    }
}
