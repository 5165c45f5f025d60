//! Classification queries.
//!
//! This module provides:
//! - Containment predicates over indexed regions (`inside`, `strictly_inside`, `overlaps`, `inside_rule`)
//! - Translation-block resolution for trimmed vs. non-trimmed blocks
//! - Fragment-level opening/closing delimiter detection

mod containment;
mod delimiters;
mod trans;

pub use delimiters::{is_block_closing, is_block_opening, is_safe_closing_tag, DelimitedBlock};
