//! Overlapping Schwarz operator.
//!
//! The local matrix produces a result that is correct on owner and overlap
//! rows. Projection then keeps each degree of freedom's value on its owner
//! only, so summing the owned entries over all processes gives the global
//! product exactly once. Projecting here rather than before the
//! preconditioner keeps the defect passed to the preconditioner read-only.

use crate::core::traits::{check_len, AssembledLinearOperator, LinearOperator, SolverCategory};
use crate::error::SyncError;
use crate::matrix::LocalMatrix;
use crate::parallel::ParallelInformation;
use num_traits::Float;
use std::marker::PhantomData;

pub struct OverlappingSchwarzOperator<'a, M, P, T> {
    matrix: &'a M,
    comm: &'a P,
    _phantom: PhantomData<T>,
}

impl<'a, M, P, T> OverlappingSchwarzOperator<'a, M, P, T>
where
    M: LocalMatrix<T>,
    P: ParallelInformation,
    T: Float,
{
    pub fn new(matrix: &'a M, comm: &'a P) -> Self {
        Self { matrix, comm, _phantom: PhantomData }
    }

    pub fn comm(&self) -> &P {
        self.comm
    }
}

impl<M, P, T> LinearOperator<T> for OverlappingSchwarzOperator<'_, M, P, T>
where
    M: LocalMatrix<T>,
    P: ParallelInformation,
    T: Float,
{
    /// y = A x, then project.
    fn apply(&self, x: &[T], y: &mut [T]) -> Result<(), SyncError> {
        check_len(self.matrix.ncols(), x.len())?;
        check_len(self.matrix.nrows(), y.len())?;
        y.fill(T::zero());
        self.matrix.umv(x, y);
        self.comm.project(y);
        Ok(())
    }

    /// y = y + α A x, then project.
    fn apply_scale_add(&self, alpha: T, x: &[T], y: &mut [T]) -> Result<(), SyncError> {
        check_len(self.matrix.ncols(), x.len())?;
        check_len(self.matrix.nrows(), y.len())?;
        self.matrix.usmv(alpha, x, y);
        self.comm.project(y);
        Ok(())
    }

    fn category(&self) -> SolverCategory {
        SolverCategory::Overlapping
    }
}

impl<M, P, T> AssembledLinearOperator<T, M> for OverlappingSchwarzOperator<'_, M, P, T>
where
    M: LocalMatrix<T>,
    P: ParallelInformation,
    T: Float,
{
    fn matrix(&self) -> &M {
        self.matrix
    }
}
