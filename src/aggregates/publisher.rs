//! Making a process-local aggregate assignment globally consistent.
//!
//! Aggregate membership is owner-authoritative: after publication every
//! overlap and copy replica of a degree of freedom belongs to the aggregate
//! its owner chose, named in the replica's own local numbering.

use super::gather_scatter::AggregatesGatherScatter;
use super::global::GlobalAggregatesMap;
use super::map::AggregatesMap;
use crate::core::traits::SolverCategory;
use crate::error::SyncError;
use crate::index::GlobalLookupIndexSet;
use crate::parallel::ParallelInformation;
use log::debug;

/// Strategy for publishing aggregates through a communication object.
pub trait AggregatesPublisher<P: ParallelInformation> {
    fn publish(
        &self,
        aggregates: &mut AggregatesMap,
        pinfo: &P,
        lookup: &GlobalLookupIndexSet<'_>,
    ) -> Result<(), SyncError>;
}

/// Owner-to-all broadcast of global aggregate names. One blocking collective.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistributedPublisher;

impl<P: ParallelInformation> AggregatesPublisher<P> for DistributedPublisher {
    fn publish(
        &self,
        aggregates: &mut AggregatesMap,
        pinfo: &P,
        lookup: &GlobalLookupIndexSet<'_>,
    ) -> Result<(), SyncError> {
        debug!("publishing {} aggregate slots owner-to-all", aggregates.len());
        let mut view = GlobalAggregatesMap::new(aggregates, lookup);
        pinfo.copy_owner_to_all_in_place::<AggregatesGatherScatter, _>(&mut view)
    }
}

/// Single process: nothing is replicated, nothing to do.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialPublisher;

impl<P: ParallelInformation> AggregatesPublisher<P> for SequentialPublisher {
    fn publish(
        &self,
        _aggregates: &mut AggregatesMap,
        _pinfo: &P,
        _lookup: &GlobalLookupIndexSet<'_>,
    ) -> Result<(), SyncError> {
        Ok(())
    }
}

/// Publisher chosen at runtime from a [`SolverCategory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishStrategy {
    Distributed,
    Sequential,
}

impl PublishStrategy {
    pub fn for_category(category: SolverCategory) -> Self {
        match category {
            SolverCategory::Overlapping => PublishStrategy::Distributed,
            SolverCategory::Sequential => PublishStrategy::Sequential,
        }
    }
}

impl<P: ParallelInformation> AggregatesPublisher<P> for PublishStrategy {
    fn publish(
        &self,
        aggregates: &mut AggregatesMap,
        pinfo: &P,
        lookup: &GlobalLookupIndexSet<'_>,
    ) -> Result<(), SyncError> {
        match self {
            PublishStrategy::Distributed => DistributedPublisher.publish(aggregates, pinfo, lookup),
            PublishStrategy::Sequential => SequentialPublisher.publish(aggregates, pinfo, lookup),
        }
    }
}

/// Publish with the strategy matching the communication object's category.
pub fn publish_aggregates<P: ParallelInformation>(
    aggregates: &mut AggregatesMap,
    pinfo: &P,
    lookup: &GlobalLookupIndexSet<'_>,
) -> Result<(), SyncError> {
    PublishStrategy::for_category(pinfo.category()).publish(aggregates, pinfo, lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::AggregateState;
    use crate::index::ParallelIndexSet;
    use crate::parallel::SequentialInformation;

    #[test]
    fn sequential_publication_is_a_no_op() {
        let set = ParallelIndexSet::identity(3);
        let lookup = GlobalLookupIndexSet::new(&set);
        let mut aggs = AggregatesMap::from_states(vec![
            AggregateState::Assigned(0),
            AggregateState::Unaggregated,
            AggregateState::Isolated,
        ]);
        let before = aggs.clone();
        publish_aggregates(&mut aggs, &SequentialInformation::new(), &lookup).unwrap();
        assert_eq!(aggs, before);
    }

    #[test]
    fn strategy_follows_category() {
        assert_eq!(PublishStrategy::for_category(SolverCategory::Overlapping), PublishStrategy::Distributed);
        assert_eq!(PublishStrategy::for_category(SolverCategory::Sequential), PublishStrategy::Sequential);
    }
}
