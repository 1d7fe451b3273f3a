//! View of an [`AggregatesMap`] in global numbering.
//!
//! An aggregate is named locally by one of its member vertices, so its
//! globally communicable name is that vertex's global index. Isolated
//! vertices travel as [`ISOLATED_MARKER`].

use super::map::{AggregateState, AggregatesMap};
use crate::error::SyncError;
use crate::index::{GlobalIndex, GlobalLookupIndexSet};

/// Global name of "isolated, no aggregate".
///
/// Never a legitimate global index: [`crate::index::ParallelIndexSet::new`]
/// rejects negative globals.
pub const ISOLATED_MARKER: GlobalIndex = -1;

pub struct GlobalAggregatesMap<'a> {
    aggregates: &'a mut AggregatesMap,
    lookup: &'a GlobalLookupIndexSet<'a>,
}

impl<'a> GlobalAggregatesMap<'a> {
    pub fn new(aggregates: &'a mut AggregatesMap, lookup: &'a GlobalLookupIndexSet<'a>) -> Self {
        Self { aggregates, lookup }
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    /// Global name of the aggregate vertex `i` belongs to.
    pub fn get(&self, i: usize) -> Result<GlobalIndex, SyncError> {
        let state = self.aggregates.get(i).ok_or_else(|| {
            SyncError::InvariantViolation(format!(
                "vertex {i} outside an aggregate map of {} vertices",
                self.aggregates.len()
            ))
        })?;
        match state {
            AggregateState::Isolated => Ok(ISOLATED_MARKER),
            AggregateState::Unaggregated => Err(SyncError::InvariantViolation(format!(
                "vertex {i} is still unaggregated"
            ))),
            AggregateState::Assigned(id) => self
                .lookup
                .pair(id)
                .map(|p| p.global())
                .ok_or_else(|| {
                    SyncError::InvariantViolation(format!(
                        "aggregate {id} of vertex {i} has no index pair"
                    ))
                }),
        }
    }

    /// Whether `set(i, global)` would succeed, without touching the map.
    pub fn check(&self, i: usize, global: GlobalIndex) -> Result<(), SyncError> {
        self.resolve(i, global).map(|_| ())
    }

    /// Store the aggregate named by `global` for vertex `i`, translated to
    /// this process's local numbering.
    pub fn set(&mut self, i: usize, global: GlobalIndex) -> Result<(), SyncError> {
        let state = self.resolve(i, global)?;
        self.aggregates.set(i, state);
        Ok(())
    }

    fn resolve(&self, i: usize, global: GlobalIndex) -> Result<AggregateState, SyncError> {
        if i >= self.aggregates.len() {
            return Err(SyncError::InvariantViolation(format!(
                "vertex {i} outside an aggregate map of {} vertices",
                self.aggregates.len()
            )));
        }
        if global == ISOLATED_MARKER {
            return Ok(AggregateState::Isolated);
        }
        let pair = self.lookup.get(global).ok_or_else(|| {
            SyncError::InvariantViolation(format!(
                "aggregate {global} received for vertex {i} is unknown on this process"
            ))
        })?;
        Ok(AggregateState::Assigned(pair.local()))
    }
}
