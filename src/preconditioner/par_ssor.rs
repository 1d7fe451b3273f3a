use crate::core::traits::{check_len, SolverCategory};
use crate::error::SyncError;
use crate::matrix::LocalMatrix;
use crate::parallel::{CommValue, CopyGatherScatter, ParallelInformation};
use crate::preconditioner::relaxation::{sor_backward, sor_forward};
use crate::preconditioner::Preconditioner;
use num_traits::Float;
use std::marker::PhantomData;

/// Symmetric SOR on each subdomain, with owner values copied to all replicas
/// of the update after every application.
pub struct ParSsor<'a, M, P, T> {
    matrix: &'a M,
    its: usize,
    omega: T,
    comm: &'a P,
    _phantom: PhantomData<T>,
}

impl<'a, M, P, T> ParSsor<'a, M, P, T>
where
    M: LocalMatrix<T>,
    P: ParallelInformation,
    T: Float,
{
    /// Checks that `matrix` is square with a non-zero diagonal.
    pub fn new(matrix: &'a M, its: usize, omega: T, comm: &'a P) -> Result<Self, SyncError> {
        check_len(matrix.nrows(), matrix.ncols())?;
        if let Some(i) = (0..matrix.nrows()).find(|&i| matrix.diagonal(i) == T::zero()) {
            return Err(SyncError::ZeroPivot(i));
        }
        Ok(Self { matrix, its, omega, comm, _phantom: PhantomData })
    }

    pub fn its(&self) -> usize {
        self.its
    }

    pub fn omega(&self) -> T {
        self.omega
    }
}

impl<M, P, T> Preconditioner<T> for ParSsor<'_, M, P, T>
where
    M: LocalMatrix<T>,
    P: ParallelInformation,
    T: Float + CommValue,
{
    fn pre(&mut self, x: &mut [T], _b: &mut [T]) -> Result<(), SyncError> {
        self.comm.copy_owner_to_all_in_place::<CopyGatherScatter, [T]>(x)
    }

    fn apply(&mut self, v: &mut [T], d: &[T]) -> Result<(), SyncError> {
        for _ in 0..self.its {
            sor_forward(self.matrix, v, d, self.omega)?;
            sor_backward(self.matrix, v, d, self.omega)?;
        }
        self.comm.copy_owner_to_all_in_place::<CopyGatherScatter, [T]>(v)
    }

    fn category(&self) -> SolverCategory {
        SolverCategory::Overlapping
    }
}
