//! Document spans, region kinds and the region index cache.
//!
//! This module provides:
//! - `Span` for half-open byte intervals into a document
//! - `RegionKind` and the crate-internal `RegionIndex` for per-kind protected spans
//! - `RegionCache` and `DocumentRegions` for memoized classification

mod region;
mod state;
mod text;

pub use region::{RegionKind, Suppression};
pub use state::{DocumentRegions, RegionCache, DEFAULT_MAX_ENTRIES};
pub use text::Span;
