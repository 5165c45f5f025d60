//! Opening/closing delimiter detection on short fragments.
//!
//! A fragment such as `<!-- x --><!--` holds a complete inline block followed
//! by a genuine opener. Delimiters are therefore only searched for after the
//! last inline block in the fragment.

use crate::patterns::{Pattern, PatternSet};

/// Block families whose delimiters are classified per fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimitedBlock {
    Ignored,
    ScriptStyle,
}

/// Search for `delimiter` after the last `inline` match in `fragment`.
fn after_inline(inline: &Pattern, delimiter: &Pattern, fragment: &str) -> bool {
    let last_index = inline.last_match_end(fragment);
    delimiter.is_match(&fragment[last_index..])
}

/// Whether `fragment` opens a block that stays open past the fragment.
pub fn is_block_opening(patterns: &PatternSet, block: DelimitedBlock, fragment: &str) -> bool {
    match block {
        DelimitedBlock::Ignored => after_inline(
            patterns.ignored_blocks_inline(),
            patterns.ignored_block_opening(),
            fragment,
        ),
        DelimitedBlock::ScriptStyle => after_inline(
            patterns.script_style_inline(),
            patterns.script_style_opening(),
            fragment,
        ),
    }
}

/// Whether `fragment` closes a block opened before it.
pub fn is_block_closing(patterns: &PatternSet, block: DelimitedBlock, fragment: &str) -> bool {
    match block {
        DelimitedBlock::Ignored => after_inline(
            patterns.ignored_inline_blocks(),
            patterns.ignored_block_closing(),
            fragment,
        ),
        DelimitedBlock::ScriptStyle => after_inline(
            patterns.script_style_inline_closing(),
            patterns.script_style_closing(),
            fragment,
        ),
    }
}

/// Whether `fragment` ends with a safe closing tag that is not part of an
/// ignored block or ignored inline block.
pub fn is_safe_closing_tag(patterns: &PatternSet, fragment: &str) -> bool {
    after_inline(
        patterns.safe_closing_prefix(),
        patterns.safe_closing_tag(),
        fragment,
    )
}
