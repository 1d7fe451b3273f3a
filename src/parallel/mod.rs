//! Communication layer.
//!
//! [`Comm`] is the raw transport (ranks, barrier, all-reduce, point-to-point
//! exchange). [`ParallelInformation`] is the communication object the solver
//! components talk to: owner-to-all broadcast, projection and consistent
//! reductions over an owner/overlap/copy partition.
//!
//! Every method on both traits that touches a peer is a blocking collective:
//! all ranks sharing the partition must make the matching call in the same
//! order.

use crate::error::SyncError;

pub mod info;
pub mod owner_overlap_copy;
pub mod serial_comm;
pub mod thread_comm;

#[cfg(feature = "mpi")]
pub mod mpi_comm;
#[cfg(feature = "mpi")]
pub use mpi_comm::MpiComm;

pub use info::{CopyGatherScatter, GatherScatter, ParallelInformation, SequentialInformation};
pub use owner_overlap_copy::OwnerOverlapCopyCommunication;
pub use serial_comm::SerialComm;
pub use thread_comm::ThreadComm;

/// Values that can travel through a [`Comm`].
#[cfg(feature = "mpi")]
pub trait CommValue: Copy + Default + Send + 'static + mpi::datatype::Equivalence {}
#[cfg(feature = "mpi")]
impl<T: Copy + Default + Send + 'static + mpi::datatype::Equivalence> CommValue for T {}

/// Values that can travel through a [`Comm`].
#[cfg(not(feature = "mpi"))]
pub trait CommValue: Copy + Default + Send + 'static {}
#[cfg(not(feature = "mpi"))]
impl<T: Copy + Default + Send + 'static> CommValue for T {}

pub trait Comm {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;
    fn barrier(&self);
    /// Sum `x` over all ranks. Every rank receives the same value.
    fn all_reduce(&self, x: f64) -> Result<f64, SyncError>;
    /// Send one buffer to each destination in `sends` and receive exactly one
    /// buffer of the given length from each source in `recvs`.
    ///
    /// Returned buffers are in the order of `recvs`.
    fn exchange<T: CommValue>(
        &self,
        sends: Vec<(usize, Vec<T>)>,
        recvs: &[(usize, usize)],
    ) -> Result<Vec<Vec<T>>, SyncError>;
}
