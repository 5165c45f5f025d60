//! Line expansion: put HTML tags and template tags on their own lines.
//!
//! Expansion runs four rewrites in order: break before HTML tags, break
//! after HTML tags, break before template tags, break after template tags.
//! Each rewrite is a single left-to-right substitution classified against
//! its own input text, so later rewrites see breaks inserted by earlier ones
//! while a rewrite never sees its own insertions.
//!
//! A match that gets a break is replaced by its first capture group plus the
//! newline, so a pattern may consume surrounding whitespace it wants
//! normalised. A match whose break is suppressed is copied through verbatim.

use crate::document::{DocumentRegions, RegionCache, Span};
use crate::patterns::{Pattern, PatternSet};

/// Which side of a match gets the line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

/// Whether a rewrite may break around a match.
type BreakFilter = fn(&DocumentRegions<'_>, Span, Span) -> bool;

/// Split `html` into lines around HTML tags and template tags.
///
/// No break is inserted inside protected regions, and no break is inserted
/// in front of a match at offset 0.
#[tracing::instrument(level = "debug", skip_all, fields(len = html.len()))]
pub fn expand_html(html: &str, patterns: &PatternSet, cache: &RegionCache) -> String {
    let html = rewrite(
        html,
        patterns,
        cache,
        patterns.break_before_html(),
        Side::Before,
        html_break_allowed,
    );
    let html = rewrite(
        &html,
        patterns,
        cache,
        patterns.break_after_html(),
        Side::After,
        html_break_allowed,
    );
    let html = rewrite(
        &html,
        patterns,
        cache,
        patterns.break_before_template(),
        Side::Before,
        template_break_allowed,
    );
    rewrite(
        &html,
        patterns,
        cache,
        patterns.break_after_template(),
        Side::After,
        template_break_allowed,
    )
}

/// HTML tags stay put inside protected regions and template blocks.
fn html_break_allowed(regions: &DocumentRegions<'_>, matched: Span, _kept: Span) -> bool {
    let protected = regions.patterns().protected_regions();
    !regions.inside(protected, matched) && !regions.inside_template_block(matched)
}

/// Template tags stay put inside protected regions and inside the attribute
/// area of an HTML start tag, e.g. `<div class="{{ cls }}">`.
fn template_break_allowed(regions: &DocumentRegions<'_>, matched: Span, kept: Span) -> bool {
    let protected = regions.patterns().protected_regions();
    if regions.inside(protected, matched) {
        return false;
    }
    !inside_start_tag(regions, kept)
}

/// Whether the text before `tag` ends within an unclosed start tag of one
/// of the indent-relevant HTML elements.
fn inside_start_tag(regions: &DocumentRegions<'_>, tag: Span) -> bool {
    let scanned = &regions.document()[..tag.start];
    regions.patterns().html_attribute_scan().is_match(scanned)
}

fn rewrite(
    text: &str,
    patterns: &PatternSet,
    cache: &RegionCache,
    pattern: &Pattern,
    side: Side,
    allowed: BreakFilter,
) -> String {
    let regions = cache.regions(patterns, text);
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut last = 0;
    let mut breaks = 0usize;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let kept = caps.get(1).unwrap_or(whole);
        let matched = Span::from(whole);

        out.push_str(&text[last..whole.start()]);
        last = whole.end();

        let leading = side == Side::Before && matched.start == 0;
        if leading || !allowed(&regions, matched, kept.into()) {
            tracing::trace!(pattern = pattern.name(), ?matched, "break suppressed");
            out.push_str(whole.as_str());
            continue;
        }

        // group 1 is the text kept; anything else in the match is dropped
        breaks += 1;
        match side {
            Side::Before => {
                out.push('\n');
                out.push_str(kept.as_str());
            }
            Side::After => {
                out.push_str(kept.as_str());
                out.push('\n');
            }
        }
    }
    out.push_str(&text[last..]);

    tracing::debug!(pattern = pattern.name(), breaks, "expansion rewrite");
    out
}
