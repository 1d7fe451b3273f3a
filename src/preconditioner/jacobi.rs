// Jacobi preconditioner implementation

use crate::preconditioner::Preconditioner;
use crate::preconditioner::relaxation::jacobi_step;
use crate::core::traits::check_len;
use crate::matrix::LocalMatrix;
use crate::error::SyncError;
use num_traits::Float;

/// Damped Jacobi: v ← v + ω D⁻¹ (d - A v), `its` times.
pub struct SeqJacobi<'a, M, T> {
    matrix: &'a M,
    its: usize,
    omega: T,
    pub(crate) inv_diag: Vec<T>,
}

impl<'a, M, T> SeqJacobi<'a, M, T>
where
    M: LocalMatrix<T>,
    T: Float,
{
    pub fn new(matrix: &'a M, its: usize, omega: T) -> Result<Self, SyncError> {
        check_len(matrix.nrows(), matrix.ncols())?;
        let inv_diag = (0..matrix.nrows())
            .map(|i| {
                let d = matrix.diagonal(i);
                if d == T::zero() { Err(SyncError::ZeroPivot(i)) } else { Ok(T::one() / d) }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matrix, its, omega, inv_diag })
    }

    pub fn its(&self) -> usize { self.its }
    pub fn omega(&self) -> T { self.omega }
}

impl<M, T> Preconditioner<T> for SeqJacobi<'_, M, T>
where
    M: LocalMatrix<T>,
    T: Float,
{
    fn apply(&mut self, v: &mut [T], d: &[T]) -> Result<(), SyncError> {
        for _ in 0..self.its {
            jacobi_step(self.matrix, v, d, &self.inv_diag, self.omega)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::CsrMatrix;
    use approx::assert_relative_eq;

    #[test]
    fn inverse_diagonal_and_single_step() {
        let a = CsrMatrix::from_triplets(2, 2, &[(0, 0, 2.0), (0, 1, 1.0), (1, 1, 4.0)]).unwrap();
        let mut jac = SeqJacobi::new(&a, 1, 1.0).unwrap();
        assert_eq!(jac.inv_diag, vec![0.5, 0.25]);
        let mut v = vec![0.0; 2];
        jac.apply(&mut v, &[2.0, 4.0]).unwrap();
        assert_relative_eq!(v.as_slice(), [1.0, 1.0].as_slice(), epsilon = 1e-12);
    }

    #[test]
    fn missing_diagonal_is_a_zero_pivot() {
        let a = CsrMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (1, 0, 1.0)]).unwrap();
        assert!(matches!(SeqJacobi::new(&a, 1, 1.0), Err(SyncError::ZeroPivot(1))));
    }
}
