//! Communication object for overlapping owner/overlap/copy partitions.

use super::info::{local_dot, GatherScatter, ParallelInformation};
use super::{Comm, CommValue};
use crate::core::traits::{check_len, SolverCategory};
use crate::error::SyncError;
use crate::index::{GlobalLookupIndexSet, Interface, ParallelIndexSet, RemoteIndices};
use log::debug;
use num_traits::{Float, NumCast};

/// Owns the transport, the local index set and the owner-to-all interface
/// derived from it.
///
/// Built once per linear system; rebuild it if the partition changes.
pub struct OwnerOverlapCopyCommunication<C> {
    comm: C,
    index_set: ParallelIndexSet,
    remote: RemoteIndices,
    owner_to_all: Interface,
}

impl<C: Comm> OwnerOverlapCopyCommunication<C> {
    /// Discover remote indices against all other ranks. Collective.
    pub fn new(comm: C, index_set: ParallelIndexSet) -> Result<Self, SyncError> {
        let remote = RemoteIndices::build(&comm, &index_set)?;
        Self::from_remote(comm, index_set, remote)
    }

    /// Discover remote indices against a known, symmetric neighbourhood. Collective.
    pub fn with_neighbours(comm: C, index_set: ParallelIndexSet, neighbours: &[usize]) -> Result<Self, SyncError> {
        let remote = RemoteIndices::build_with_neighbours(&comm, &index_set, neighbours)?;
        Self::from_remote(comm, index_set, remote)
    }

    fn from_remote(comm: C, index_set: ParallelIndexSet, remote: RemoteIndices) -> Result<Self, SyncError> {
        let owner_to_all = Interface::owner_to_all(&remote)?;
        debug!(
            "rank {}: owner-to-all interface with {} links, {} sends, {} receives",
            comm.rank(),
            owner_to_all.links().len(),
            owner_to_all.send_count(),
            owner_to_all.recv_count()
        );
        Ok(Self { comm, index_set, remote, owner_to_all })
    }

    pub fn comm(&self) -> &C {
        &self.comm
    }

    pub fn index_set(&self) -> &ParallelIndexSet {
        &self.index_set
    }

    pub fn remote_indices(&self) -> &RemoteIndices {
        &self.remote
    }

    /// Reverse lookup over this object's index set.
    pub fn global_lookup(&self) -> GlobalLookupIndexSet<'_> {
        GlobalLookupIndexSet::new(&self.index_set)
    }

    // Entries missing from the index set are purely local and count as owned.
    fn owns(&self, local: usize) -> bool {
        self.index_set.pair(local).is_none_or(|p| p.is_owner())
    }

    fn gather_sends<G, D>(&self, source: &D) -> Result<Vec<(usize, Vec<G::Value>)>, SyncError>
    where
        G: GatherScatter<D>,
        D: ?Sized,
    {
        self.owner_to_all
            .links()
            .iter()
            .filter(|link| !link.send.is_empty())
            .map(|link| -> Result<_, SyncError> {
                let buf = link
                    .send
                    .iter()
                    .map(|&i| G::gather(source, i))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((link.rank, buf))
            })
            .collect()
    }

    fn exchange_and_scatter<G, D>(&self, sends: Vec<(usize, Vec<G::Value>)>, dest: &mut D) -> Result<(), SyncError>
    where
        G: GatherScatter<D>,
        D: ?Sized,
    {
        let receivers: Vec<_> = self
            .owner_to_all
            .links()
            .iter()
            .filter(|link| !link.recv.is_empty())
            .collect();
        let recvs: Vec<(usize, usize)> = receivers.iter().map(|l| (l.rank, l.recv.len())).collect();
        let received = self.comm.exchange(sends, &recvs)?;
        for (link, buf) in receivers.iter().zip(&received) {
            for (&i, value) in link.recv.iter().zip(buf) {
                G::validate(&*dest, value, i)?;
            }
        }
        for (link, buf) in receivers.into_iter().zip(received) {
            for (&i, value) in link.recv.iter().zip(buf) {
                G::scatter(dest, value, i)?;
            }
        }
        Ok(())
    }
}

impl<C: Comm> ParallelInformation for OwnerOverlapCopyCommunication<C> {
    fn category(&self) -> SolverCategory {
        SolverCategory::Overlapping
    }

    fn copy_owner_to_all<G, D>(&self, source: &D, dest: &mut D) -> Result<(), SyncError>
    where
        G: GatherScatter<D>,
        D: ?Sized,
    {
        let sends = self.gather_sends::<G, D>(source)?;
        self.exchange_and_scatter::<G, D>(sends, dest)
    }

    fn copy_owner_to_all_in_place<G, D>(&self, data: &mut D) -> Result<(), SyncError>
    where
        G: GatherScatter<D>,
        D: ?Sized,
    {
        let sends = self.gather_sends::<G, D>(data)?;
        self.exchange_and_scatter::<G, D>(sends, data)
    }

    fn project<T: Float>(&self, x: &mut [T]) {
        for p in self.index_set.iter().filter(|p| !p.is_owner()) {
            if let Some(v) = x.get_mut(p.local()) {
                *v = T::zero();
            }
        }
    }

    fn dot<T: Float + CommValue>(&self, x: &[T], y: &[T]) -> Result<T, SyncError> {
        check_len(x.len(), y.len())?;
        let local = local_dot(x, y, |i| self.owns(i));
        let local = local
            .to_f64()
            .ok_or_else(|| SyncError::Communication("local dot product is not representable as f64".into()))?;
        let global = self.comm.all_reduce(local)?;
        <T as NumCast>::from(global)
            .ok_or_else(|| SyncError::Communication("reduced dot product does not fit the scalar type".into()))
    }
}
