//! Per-process aggregate assignment.

use crate::index::LocalIndex;
use std::ops::Index;

/// What a vertex belongs to after coarsening.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum AggregateState {
    /// Member of the aggregate named by a local representative vertex.
    Assigned(LocalIndex),
    /// Singleton, never merged, never communicated as a real aggregate.
    Isolated,
    /// Not classified yet. Must not survive coarsening.
    #[default]
    Unaggregated,
}

impl AggregateState {
    pub fn is_assigned(&self) -> bool {
        matches!(self, AggregateState::Assigned(_))
    }
}

/// Local vertex → aggregate state, filled by the coarsening heuristic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregatesMap {
    states: Vec<AggregateState>,
}

impl AggregatesMap {
    /// `n` vertices, all unaggregated.
    pub fn new(n: usize) -> Self {
        Self { states: vec![AggregateState::Unaggregated; n] }
    }

    pub fn from_states(states: Vec<AggregateState>) -> Self {
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, vertex: LocalIndex) -> Option<AggregateState> {
        self.states.get(vertex).copied()
    }

    /// Overwrite the state of `vertex`.
    ///
    /// # Panics
    /// Panics if `vertex` is out of range.
    pub fn set(&mut self, vertex: LocalIndex, state: AggregateState) {
        self.states[vertex] = state;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AggregateState> {
        self.states.iter()
    }

    /// True once no vertex is left unaggregated.
    pub fn is_complete(&self) -> bool {
        !self.states.contains(&AggregateState::Unaggregated)
    }

    /// Number of distinct assigned aggregates.
    pub fn aggregate_count(&self) -> usize {
        let mut ids: Vec<LocalIndex> = self
            .states
            .iter()
            .filter_map(|s| match s {
                AggregateState::Assigned(id) => Some(*id),
                _ => None,
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

impl Index<LocalIndex> for AggregatesMap {
    type Output = AggregateState;

    fn index(&self, vertex: LocalIndex) -> &AggregateState {
        &self.states[vertex]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_and_counts() {
        let mut map = AggregatesMap::new(4);
        assert!(!map.is_complete());
        map.set(0, AggregateState::Assigned(0));
        map.set(1, AggregateState::Assigned(0));
        map.set(2, AggregateState::Isolated);
        map.set(3, AggregateState::Assigned(3));
        assert!(map.is_complete());
        assert_eq!(map.aggregate_count(), 2);
        assert_eq!(map[2], AggregateState::Isolated);
        assert_eq!(map.get(4), None);
    }
}
