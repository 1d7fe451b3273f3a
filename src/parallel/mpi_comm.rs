//! MPI-based parallel communication module.
//!
//! This module provides an implementation of the `Comm` trait using the MPI (Message Passing Interface)
//! backend for distributed-memory parallelism. Point-to-point exchanges use immediate sends and
//! blocking tagged receives; the tag is derived from a per-communicator sequence number so that
//! messages of consecutive collectives never pair up. The implementation is only available when
//! the `mpi` feature is enabled.
//!
//! # Example
//! ```no_run
//! #[cfg(feature = "mpi")]
//! {
//!     use schwarz_sync::parallel::{Comm, MpiComm};
//!     let comm = MpiComm::new().expect("MPI init");
//!     println!("Rank: {} / {}", comm.rank(), comm.size());
//!     comm.barrier();
//! }
//! ```

use super::{Comm, CommValue};
use crate::error::SyncError;
use log::trace;
use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use std::cell::Cell;

// MPI only guarantees tags up to 32767
const TAG_SPACE: u64 = 32767;

/// MPI communicator wrapper for distributed parallelism.
///
/// Holds the MPI universe (finalized on drop), the world communicator, the rank of the
/// current process, and the total number of processes.
pub struct MpiComm {
    _universe: Universe,
    /// The MPI world communicator (all processes in the job).
    pub world: SimpleCommunicator,
    rank: usize,
    size: usize,
    seq: Cell<u64>,
}

impl MpiComm {
    /// Initializes MPI and constructs a new `MpiComm` instance.
    pub fn new() -> Result<Self, SyncError> {
        let universe = mpi::initialize()
            .ok_or_else(|| SyncError::Communication("MPI is already initialized".into()))?;
        let world = universe.world();
        let rank = world.rank() as usize;
        let size = world.size() as usize;
        Ok(MpiComm { _universe: universe, world, rank, size, seq: Cell::new(0) })
    }

    fn next_tag(&self) -> i32 {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        (seq % TAG_SPACE) as i32
    }
}

impl Comm for MpiComm {
    /// Returns the rank (ID) of this process.
    fn rank(&self) -> usize { self.rank }
    /// Returns the total number of processes in the communicator.
    fn size(&self) -> usize { self.size }
    /// Synchronizes all processes at a barrier.
    fn barrier(&self) {
        self.next_tag();
        self.world.barrier();
    }

    /// Performs an all-reduce sum operation across all processes.
    fn all_reduce(&self, x: f64) -> Result<f64, SyncError> {
        use mpi::collective::SystemOperation;
        self.next_tag();
        let mut y = x;
        self.world.all_reduce_into(&x, &mut y, &SystemOperation::sum());
        Ok(y)
    }

    fn exchange<T: CommValue>(
        &self,
        sends: Vec<(usize, Vec<T>)>,
        recvs: &[(usize, usize)],
    ) -> Result<Vec<Vec<T>>, SyncError> {
        let tag = self.next_tag();
        let mut received: Vec<Vec<T>> = recvs.iter().map(|&(_, len)| vec![T::default(); len]).collect();
        mpi::request::scope(|scope| {
            let requests: Vec<_> = sends
                .iter()
                .map(|(dest, buf)| {
                    trace!("rank {} -> {}: {} values (tag {tag})", self.rank, dest, buf.len());
                    self.world
                        .process_at_rank(*dest as i32)
                        .immediate_send_with_tag(scope, &buf[..], tag)
                })
                .collect();
            for (&(src, _), buf) in recvs.iter().zip(received.iter_mut()) {
                self.world
                    .process_at_rank(src as i32)
                    .receive_into_with_tag(&mut buf[..], tag);
            }
            for request in requests {
                request.wait();
            }
        });
        Ok(received)
    }
}
