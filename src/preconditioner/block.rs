//! Block preconditioner for overlapping Schwarz methods.

use crate::core::traits::SolverCategory;
use crate::error::SyncError;
use crate::parallel::{CommValue, CopyGatherScatter, ParallelInformation};
use crate::preconditioner::Preconditioner;
use num_traits::Float;
use std::marker::PhantomData;

/// Wraps a sequential preconditioner acting on the process-local block and
/// restores consistency after every application.
///
/// `pre` makes the initial guess consistent before delegating; `apply` runs
/// the inner preconditioner, then copies owner values to all replicas of the
/// update.
pub struct BlockPreconditioner<'c, P, Pc, T> {
    inner: Pc,
    comm: &'c P,
    _marker: PhantomData<T>,
}

impl<'c, P, Pc, T> BlockPreconditioner<'c, P, Pc, T>
where
    P: ParallelInformation,
    Pc: Preconditioner<T>,
{
    /// Fails with [`SyncError::InvariantViolation`] if `inner` is not sequential.
    pub fn new(inner: Pc, comm: &'c P) -> Result<Self, SyncError> {
        if inner.category() != SolverCategory::Sequential {
            return Err(SyncError::InvariantViolation(format!(
                "block preconditioner needs a sequential inner preconditioner, got {}",
                inner.category()
            )));
        }
        Ok(Self { inner, comm, _marker: PhantomData })
    }

    pub fn inner(&self) -> &Pc {
        &self.inner
    }

    pub fn into_inner(self) -> Pc {
        self.inner
    }
}

impl<P, Pc, T> Preconditioner<T> for BlockPreconditioner<'_, P, Pc, T>
where
    P: ParallelInformation,
    Pc: Preconditioner<T>,
    T: Float + CommValue,
{
    fn pre(&mut self, x: &mut [T], b: &mut [T]) -> Result<(), SyncError> {
        self.comm.copy_owner_to_all_in_place::<CopyGatherScatter, [T]>(x)?;
        self.inner.pre(x, b)
    }

    fn apply(&mut self, v: &mut [T], d: &[T]) -> Result<(), SyncError> {
        self.inner.apply(v, d)?;
        self.comm.copy_owner_to_all_in_place::<CopyGatherScatter, [T]>(v)
    }

    fn post(&mut self, x: &mut [T]) -> Result<(), SyncError> {
        self.inner.post(x)
    }

    fn category(&self) -> SolverCategory {
        SolverCategory::Overlapping
    }
}
