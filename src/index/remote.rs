//! Remote index discovery and the owner-to-all communication interface.

use super::index_set::{Attribute, GlobalIndex, LocalIndex, ParallelIndexSet};
use crate::error::SyncError;
use crate::parallel::Comm;
use log::debug;
use std::collections::BTreeMap;

/// A degree of freedom this process shares with one neighbour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RemoteIndex {
    pub global: GlobalIndex,
    /// Local index on this process.
    pub local: LocalIndex,
    /// Attribute on this process.
    pub attribute: Attribute,
    /// Attribute on the neighbour.
    pub remote_attribute: Attribute,
}

/// For each neighbour rank, the shared degrees of freedom in ascending global order.
#[derive(Clone, Debug, Default)]
pub struct RemoteIndices {
    neighbours: BTreeMap<usize, Vec<RemoteIndex>>,
}

impl RemoteIndices {
    /// Discover shared indices with every other rank. Collective.
    pub fn build<C: Comm>(comm: &C, index_set: &ParallelIndexSet) -> Result<Self, SyncError> {
        let peers: Vec<usize> = (0..comm.size()).filter(|&p| p != comm.rank()).collect();
        Self::build_with_neighbours(comm, index_set, &peers)
    }

    /// Discover shared indices with the given neighbours only. Collective over
    /// the neighbourhood; the neighbour relation must be symmetric.
    pub fn build_with_neighbours<C: Comm>(
        comm: &C,
        index_set: &ParallelIndexSet,
        neighbours: &[usize],
    ) -> Result<Self, SyncError> {
        let counts = comm.exchange(
            neighbours.iter().map(|&p| (p, vec![index_set.len() as i64])).collect(),
            &neighbours.iter().map(|&p| (p, 1)).collect::<Vec<_>>(),
        )?;

        let encoded: Vec<i64> = index_set
            .iter()
            .flat_map(|p| [p.global(), p.attribute().code()])
            .collect();
        let mut recvs = Vec::with_capacity(neighbours.len());
        for (&p, count) in neighbours.iter().zip(&counts) {
            let n = usize::try_from(count[0])
                .map_err(|_| SyncError::Communication(format!("rank {p} sent a negative index count")))?;
            recvs.push((p, 2 * n));
        }
        let lists = comm.exchange(
            neighbours.iter().map(|&p| (p, encoded.clone())).collect(),
            &recvs,
        )?;

        let mut remote = RemoteIndices::default();
        for (&p, list) in neighbours.iter().zip(lists) {
            let shared = intersect(index_set, &list)?;
            if !shared.is_empty() {
                remote.neighbours.insert(p, shared);
            }
        }
        debug!(
            "rank {}: {} of {} neighbours share indices",
            comm.rank(),
            remote.neighbours.len(),
            neighbours.len()
        );
        Ok(remote)
    }

    /// Neighbour ranks with at least one shared index.
    pub fn neighbours(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbours.keys().copied()
    }

    pub fn shared_with(&self, rank: usize) -> &[RemoteIndex] {
        self.neighbours.get(&rank).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[RemoteIndex])> {
        self.neighbours.iter().map(|(&r, v)| (r, v.as_slice()))
    }
}

// `remote` is a flattened (global, attribute code) list sorted by global
fn intersect(index_set: &ParallelIndexSet, remote: &[i64]) -> Result<Vec<RemoteIndex>, SyncError> {
    let mut shared = Vec::new();
    let mut mine = index_set.iter().peekable();
    for entry in remote.chunks_exact(2) {
        let (global, code) = (entry[0], entry[1]);
        while mine.next_if(|p| p.global() < global).is_some() {}
        if let Some(p) = mine.next_if(|p| p.global() == global) {
            shared.push(RemoteIndex {
                global,
                local: p.local(),
                attribute: p.attribute(),
                remote_attribute: Attribute::from_code(code)?,
            });
        }
    }
    Ok(shared)
}

/// Send and receive lists for one neighbour.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfaceLink {
    pub rank: usize,
    /// Local indices whose values go to `rank`.
    pub send: Vec<LocalIndex>,
    /// Local indices overwritten with values from `rank`.
    pub recv: Vec<LocalIndex>,
}

/// A communication pattern over the remote indices.
///
/// Both sides of a link list their entries in ascending global order, so the
/// n-th sent value on one side is the n-th received value on the other.
#[derive(Clone, Debug, Default)]
pub struct Interface {
    links: Vec<InterfaceLink>,
}

impl Interface {
    /// Owner entries are sent to every neighbour holding an overlap or copy
    /// replica; replicas receive from their owner.
    pub fn owner_to_all(remote: &RemoteIndices) -> Result<Self, SyncError> {
        let mut links = Vec::new();
        for (rank, shared) in remote.iter() {
            let mut link = InterfaceLink { rank, ..Default::default() };
            for r in shared {
                match (r.attribute, r.remote_attribute) {
                    (Attribute::Owner, Attribute::Owner) => {
                        return Err(SyncError::InvariantViolation(format!(
                            "global index {} is owned both here and on rank {rank}",
                            r.global
                        )));
                    }
                    (Attribute::Owner, _) => link.send.push(r.local),
                    (_, Attribute::Owner) => link.recv.push(r.local),
                    _ => {}
                }
            }
            if !link.send.is_empty() || !link.recv.is_empty() {
                links.push(link);
            }
        }
        Ok(Self { links })
    }

    pub fn links(&self) -> &[InterfaceLink] {
        &self.links
    }

    pub fn send_count(&self) -> usize {
        self.links.iter().map(|l| l.send.len()).sum()
    }

    pub fn recv_count(&self) -> usize {
        self.links.iter().map(|l| l.recv.len()).sum()
    }
}
