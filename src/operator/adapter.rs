// Sequential matrix operator

use crate::core::traits::{check_len, AssembledLinearOperator, LinearOperator, SolverCategory};
use crate::error::SyncError;
use crate::matrix::LocalMatrix;
use num_traits::Float;
use std::marker::PhantomData;

/// Plain `y = A x` on a single process.
pub struct MatrixAdapter<'a, M, T> {
    matrix: &'a M,
    _phantom: PhantomData<T>,
}

impl<'a, M, T> MatrixAdapter<'a, M, T>
where
    M: LocalMatrix<T>,
    T: Float,
{
    pub fn new(matrix: &'a M) -> Self {
        Self { matrix, _phantom: PhantomData }
    }
}

impl<M, T> LinearOperator<T> for MatrixAdapter<'_, M, T>
where
    M: LocalMatrix<T>,
    T: Float,
{
    fn apply(&self, x: &[T], y: &mut [T]) -> Result<(), SyncError> {
        check_len(self.matrix.ncols(), x.len())?;
        check_len(self.matrix.nrows(), y.len())?;
        y.fill(T::zero());
        self.matrix.umv(x, y);
        Ok(())
    }

    fn apply_scale_add(&self, alpha: T, x: &[T], y: &mut [T]) -> Result<(), SyncError> {
        check_len(self.matrix.ncols(), x.len())?;
        check_len(self.matrix.nrows(), y.len())?;
        self.matrix.usmv(alpha, x, y);
        Ok(())
    }

    fn category(&self) -> SolverCategory {
        SolverCategory::Sequential
    }
}

impl<M, T> AssembledLinearOperator<T, M> for MatrixAdapter<'_, M, T>
where
    M: LocalMatrix<T>,
    T: Float,
{
    fn matrix(&self) -> &M {
        self.matrix
    }
}
