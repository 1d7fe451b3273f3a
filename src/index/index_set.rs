//! Parallel index set: the bijection between a process-local index space and
//! the global index space, with an ownership attribute per entry.

use crate::error::SyncError;
use std::fmt;

/// Process-independent identifier of a degree of freedom.
///
/// Legitimate global indices are non-negative; negative values are reserved
/// (see [`crate::aggregates::ISOLATED_MARKER`]) and rejected by
/// [`ParallelIndexSet::new`].
pub type GlobalIndex = i64;

/// Offset into process-local vectors and matrix rows.
pub type LocalIndex = usize;

/// Whether this process is authoritative for a degree of freedom.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Owner,
    Overlap,
    Copy,
}

impl Attribute {
    /// Wire encoding used when index sets are exchanged.
    pub(crate) fn code(self) -> i64 {
        match self {
            Attribute::Owner => 0,
            Attribute::Overlap => 1,
            Attribute::Copy => 2,
        }
    }

    pub(crate) fn from_code(code: i64) -> Result<Self, SyncError> {
        match code {
            0 => Ok(Attribute::Owner),
            1 => Ok(Attribute::Overlap),
            2 => Ok(Attribute::Copy),
            other => Err(SyncError::Communication(format!("invalid attribute code {other}"))),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Owner => write!(f, "owner"),
            Attribute::Overlap => write!(f, "overlap"),
            Attribute::Copy => write!(f, "copy"),
        }
    }
}

/// A bound (global, local, attribute) triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndexPair {
    global: GlobalIndex,
    local: LocalIndex,
    attribute: Attribute,
}

impl IndexPair {
    pub fn new(global: GlobalIndex, local: LocalIndex, attribute: Attribute) -> Self {
        Self { global, local, attribute }
    }

    pub fn global(&self) -> GlobalIndex {
        self.global
    }

    pub fn local(&self) -> LocalIndex {
        self.local
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn is_owner(&self) -> bool {
        self.attribute == Attribute::Owner
    }
}

/// All index pairs of one process, unique by local and by global index.
///
/// Pairs are stored sorted by global index; a dense table maps local indices
/// to their position.
#[derive(Clone, Debug, Default)]
pub struct ParallelIndexSet {
    pairs: Vec<IndexPair>,
    by_local: Vec<Option<usize>>,
}

impl ParallelIndexSet {
    /// Build an index set, validating uniqueness and the reserved negative range.
    pub fn new(mut pairs: Vec<IndexPair>) -> Result<Self, SyncError> {
        if let Some(p) = pairs.iter().find(|p| p.global < 0) {
            return Err(SyncError::InvalidIndexSet(format!(
                "global index {} of local {} collides with the reserved negative range",
                p.global, p.local
            )));
        }
        pairs.sort_by_key(|p| p.global);
        if let Some(w) = pairs.windows(2).find(|w| w[0].global == w[1].global) {
            return Err(SyncError::InvalidIndexSet(format!(
                "global index {} mapped to local {} and {}",
                w[0].global, w[0].local, w[1].local
            )));
        }
        let mut extent = 0;
        for p in &pairs {
            let end = p.local.checked_add(1).ok_or_else(|| {
                SyncError::InvalidIndexSet(format!("local index {} of global {} is out of range", p.local, p.global))
            })?;
            extent = extent.max(end);
        }
        let mut by_local: Vec<Option<usize>> = Vec::new();
        by_local.try_reserve_exact(extent).map_err(|_| {
            SyncError::InvalidIndexSet(format!("cannot allocate a local table of {extent} entries"))
        })?;
        by_local.resize(extent, None);
        for (pos, p) in pairs.iter().enumerate() {
            if let Some(prev) = by_local[p.local] {
                let prev: &IndexPair = &pairs[prev];
                return Err(SyncError::InvalidIndexSet(format!(
                    "local index {} mapped to global {} and {}",
                    p.local, prev.global, p.global
                )));
            }
            by_local[p.local] = Some(pos);
        }
        Ok(Self { pairs, by_local })
    }

    /// An all-owner index set with global == local, for single-process use.
    pub fn identity(n: usize) -> Self {
        let pairs = (0..n)
            .map(|i| IndexPair::new(i as GlobalIndex, i, Attribute::Owner))
            .collect();
        Self { pairs, by_local: (0..n).map(Some).collect() }
    }

    /// The pair for a local index, or `None` if this process has no such entry.
    pub fn pair(&self, local: LocalIndex) -> Option<&IndexPair> {
        self.by_local.get(local).copied().flatten().map(|pos| &self.pairs[pos])
    }

    /// Pairs in ascending global order.
    pub fn iter(&self) -> std::slice::Iter<'_, IndexPair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn sorted_pairs(&self) -> &[IndexPair] {
        &self.pairs
    }
}

impl<'a> IntoIterator for &'a ParallelIndexSet {
    type Item = &'a IndexPair;
    type IntoIter = std::slice::Iter<'a, IndexPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
