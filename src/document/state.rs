//! Region index memoization.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use dashmap::DashMap;

use crate::patterns::PatternSet;

use super::region::{RegionIndex, RegionKind};
use super::text::Span;

/// Entry cap of a cache built with [`RegionCache::new`]. One expansion
/// touches at most four distinct texts.
pub const DEFAULT_MAX_ENTRIES: usize = 64;

/// Identity of a cached index: the pattern set's fingerprint and the full
/// document content. Equal text under equal patterns shares one index.
#[derive(Debug, Clone)]
struct CacheKey {
    patterns: Arc<str>,
    document: Arc<str>,
}

/// Borrowed view of a cache key, so lookups need no owned copy of the text.
trait KeyView {
    fn parts(&self) -> (&str, &str);
}

impl KeyView for CacheKey {
    fn parts(&self) -> (&str, &str) {
        (&self.patterns, &self.document)
    }
}

impl KeyView for (&str, &str) {
    fn parts(&self) -> (&str, &str) {
        *self
    }
}

impl<'a> Borrow<dyn KeyView + 'a> for CacheKey {
    fn borrow(&self) -> &(dyn KeyView + 'a) {
        self
    }
}

impl Hash for dyn KeyView + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts().hash(state);
    }
}

impl PartialEq for dyn KeyView + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.parts() == other.parts()
    }
}

impl Eq for dyn KeyView + '_ {}

// must hash exactly like `dyn KeyView`
impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts().hash(state);
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.parts() == other.parts()
    }
}

impl Eq for CacheKey {}

/// Thread-safe, bounded store of region indexes.
///
/// When an insert would grow the cache past its cap, the cache is emptied
/// first. Entries may be dropped at any time; a dropped entry is simply
/// recomputed.
#[derive(Debug)]
pub struct RegionCache {
    entries: DashMap<CacheKey, Arc<RegionIndex>>,
    max_entries: usize,
}

impl Default for RegionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionCache {
    /// Create a cache capped at [`DEFAULT_MAX_ENTRIES`].
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a cache that is emptied whenever it would grow past `max_entries`.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Region view of `document` under `patterns`, reusing a cached index
    /// when the same text was classified before.
    pub fn regions<'a>(&self, patterns: &'a PatternSet, document: &'a str) -> DocumentRegions<'a> {
        let lookup: (&str, &str) = (&**patterns.fingerprint(), document);
        if let Some(index) = self.entries.get(&lookup as &dyn KeyView) {
            tracing::trace!(len = document.len(), "region cache hit");
            return DocumentRegions::with_index(patterns, document, Arc::clone(&index));
        }

        if self.entries.len() >= self.max_entries {
            tracing::debug!(entries = self.entries.len(), "region cache full, clearing");
            self.entries.clear();
        }

        tracing::debug!(len = document.len(), "region cache miss");
        let key = CacheKey {
            patterns: Arc::clone(patterns.fingerprint()),
            document: Arc::from(document),
        };
        let index = Arc::clone(
            self.entries
                .entry(key)
                .or_insert_with(|| Arc::new(RegionIndex::new()))
                .value(),
        );
        DocumentRegions::with_index(patterns, document, index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// One document classified under one pattern set.
///
/// Holds the text, the patterns and the shared index, so repeated queries
/// against the same pass never rematch.
#[derive(Debug, Clone)]
pub struct DocumentRegions<'a> {
    pub(crate) document: &'a str,
    pub(crate) patterns: &'a PatternSet,
    pub(crate) index: Arc<RegionIndex>,
}

impl<'a> DocumentRegions<'a> {
    /// Uncached view with a fresh index.
    pub fn new(patterns: &'a PatternSet, document: &'a str) -> Self {
        Self::with_index(patterns, document, Arc::new(RegionIndex::new()))
    }

    fn with_index(patterns: &'a PatternSet, document: &'a str, index: Arc<RegionIndex>) -> Self {
        Self {
            document,
            patterns,
            index,
        }
    }

    pub fn document(&self) -> &'a str {
        self.document
    }

    pub fn patterns(&self) -> &'a PatternSet {
        self.patterns
    }

    /// Spans of one kind, in the order the matcher reported them.
    pub fn spans(&self, kind: RegionKind) -> &[Span] {
        self.index.spans(self.patterns, self.document, kind)
    }

    /// Spans of several kinds chained in the order the kinds are given.
    pub fn spans_of<'s>(&'s self, kinds: &'s [RegionKind]) -> impl Iterator<Item = Span> + 's {
        kinds.iter().flat_map(move |&kind| self.spans(kind).iter().copied())
    }

    /// Whether two views share the same underlying index.
    pub fn shares_index_with(&self, other: &DocumentRegions<'_>) -> bool {
        Arc::ptr_eq(&self.index, &other.index)
    }
}
