//! Trimmed vs. non-trimmed translation blocks.
//!
//! Content of a non-trimmed translation block must stay exactly as authored;
//! a trimmed block may be reflowed. Without a parse stack, the nearest
//! enclosing block is taken to be whichever family's latest span ends last.
//! That holds as long as blocks of one family do not nest inside each other.

use crate::document::{DocumentRegions, RegionKind, Span};

const NON_TRIMMED: RegionKind = RegionKind::TransBlock { trimmed: false };
const TRIMMED: RegionKind = RegionKind::TransBlock { trimmed: true };

impl DocumentRegions<'_> {
    /// Whether the closing translation delimiter in `document[span]` closes
    /// protected (non-trimmed) content.
    ///
    /// Callers scanning line by line pass the text consumed so far as the
    /// document, so the latest block of each family is the one still open
    /// at the candidate.
    pub fn inside_protected_trans_block(&self, span: Span) -> bool {
        let Some(fragment) = self.document.get(span.as_range()) else {
            return false;
        };
        let patterns = self.patterns;

        let Some(close) = patterns.ignored_trans_blocks_closing().find(fragment) else {
            return false;
        };
        let close_end = close.offset(span.start).end;

        let latest_non_trimmed = self.spans(NON_TRIMMED).last().copied();
        let latest_trimmed = self.spans(TRIMMED).last().copied();

        match (latest_non_trimmed, latest_trimmed) {
            (Some(non_trimmed), trimmed)
                if trimmed.map_or(true, |trimmed| non_trimmed.end > trimmed.end) =>
            {
                // opened and closed within the fragment itself
                if patterns.ignored_trans_blocks().is_match(fragment) {
                    let rest = self.document.get(non_trimmed.end..).unwrap_or("");
                    let reopened = patterns.ignored_trans_blocks_closing().is_match(rest);
                    tracing::trace!(?span, reopened, "inline non-trimmed translation block");
                    return reopened;
                }
                close_end <= non_trimmed.end
            }
            (_, Some(trimmed)) => close_end > trimmed.end,
            _ => false,
        }
    }
}
