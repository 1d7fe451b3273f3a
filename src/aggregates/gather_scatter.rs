use super::global::GlobalAggregatesMap;
use crate::error::SyncError;
use crate::index::GlobalIndex;
use crate::parallel::GatherScatter;

/// Lets the transport broadcast an aggregate map like any consistent vector:
/// values leave as global aggregate names and are translated back on arrival.
pub struct AggregatesGatherScatter;

impl<'a> GatherScatter<GlobalAggregatesMap<'a>> for AggregatesGatherScatter {
    type Value = GlobalIndex;

    fn gather(view: &GlobalAggregatesMap<'a>, i: usize) -> Result<GlobalIndex, SyncError> {
        view.get(i)
    }

    fn validate(view: &GlobalAggregatesMap<'a>, global: &GlobalIndex, i: usize) -> Result<(), SyncError> {
        view.check(i, *global)
    }

    fn scatter(view: &mut GlobalAggregatesMap<'a>, global: GlobalIndex, i: usize) -> Result<(), SyncError> {
        view.set(i, global)
    }
}
