//! Read-optimized reverse index over a [`ParallelIndexSet`].

use super::index_set::{GlobalIndex, IndexPair, LocalIndex, ParallelIndexSet};

/// Global → pair lookup by binary search over the globally sorted pairs,
/// local → pair through the index set's table.
///
/// Built once per index set; rebuild it if the index set changes.
#[derive(Clone, Copy, Debug)]
pub struct GlobalLookupIndexSet<'a> {
    index_set: &'a ParallelIndexSet,
}

impl<'a> GlobalLookupIndexSet<'a> {
    pub fn new(index_set: &'a ParallelIndexSet) -> Self {
        Self { index_set }
    }

    /// The pair holding `global`, if this process has it.
    pub fn get(&self, global: GlobalIndex) -> Option<&'a IndexPair> {
        let pairs = self.index_set.sorted_pairs();
        pairs
            .binary_search_by_key(&global, |p| p.global())
            .ok()
            .map(|pos| &pairs[pos])
    }

    /// The pair for a local index.
    pub fn pair(&self, local: LocalIndex) -> Option<&'a IndexPair> {
        self.index_set.pair(local)
    }

    pub fn index_set(&self) -> &'a ParallelIndexSet {
        self.index_set
    }

    pub fn len(&self) -> usize {
        self.index_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_set.is_empty()
    }
}
