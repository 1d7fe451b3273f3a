//! Scalar products matching the solver category.

use crate::core::traits::{check_len, ScalarProduct, SolverCategory};
use crate::error::SyncError;
use crate::parallel::{CommValue, ParallelInformation};
use num_traits::Float;

/// Local Euclidean inner product.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeqScalarProduct;

impl<T: Float> ScalarProduct<T> for SeqScalarProduct {
    fn dot(&self, x: &[T], y: &[T]) -> Result<T, SyncError> {
        check_len(x.len(), y.len())?;
        Ok(x.iter().zip(y).fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    fn norm(&self, x: &[T]) -> Result<T, SyncError> {
        Ok(x.iter().fold(T::zero(), |acc, &a| acc + a * a).sqrt())
    }

    fn category(&self) -> SolverCategory {
        SolverCategory::Sequential
    }
}

/// Inner product for overlapping Schwarz methods.
///
/// Both vectors must be consistent on owner and overlap entries; each degree
/// of freedom is counted once, by its owner.
pub struct OverlappingSchwarzScalarProduct<'a, P> {
    comm: &'a P,
}

impl<'a, P: ParallelInformation> OverlappingSchwarzScalarProduct<'a, P> {
    pub fn new(comm: &'a P) -> Self {
        Self { comm }
    }
}

impl<P, T> ScalarProduct<T> for OverlappingSchwarzScalarProduct<'_, P>
where
    P: ParallelInformation,
    T: Float + CommValue,
{
    fn dot(&self, x: &[T], y: &[T]) -> Result<T, SyncError> {
        self.comm.dot(x, y)
    }

    fn norm(&self, x: &[T]) -> Result<T, SyncError> {
        self.comm.norm(x)
    }

    fn category(&self) -> SolverCategory {
        SolverCategory::Overlapping
    }
}

/// The scalar product matching `comm`'s category.
pub fn scalar_product_for<'a, P, T>(comm: &'a P) -> Box<dyn ScalarProduct<T> + 'a>
where
    P: ParallelInformation,
    T: Float + CommValue,
{
    match comm.category() {
        SolverCategory::Sequential => Box::new(SeqScalarProduct),
        SolverCategory::Overlapping => Box::new(OverlappingSchwarzScalarProduct::new(comm)),
    }
}
