//! Local relaxation sweeps for A x = b.
//!
//! These touch only process-local data; callers synchronize around them.

use crate::core::traits::check_len;
use crate::error::SyncError;
use crate::matrix::LocalMatrix;
use num_traits::Float;

fn check_shapes<M, T>(a: &M, x: &[T], b: &[T]) -> Result<(), SyncError>
where
    M: LocalMatrix<T>,
    T: Float,
{
    check_len(a.nrows(), a.ncols())?;
    check_len(a.nrows(), x.len())?;
    check_len(a.nrows(), b.len())
}

// x_i ← (1-ω) x_i + ω (b_i - Σ_{j≠i} a_ij x_j) / a_ii, with the newest x_j
fn relax_row<M, T>(a: &M, x: &mut [T], b: &[T], omega: T, i: usize) -> Result<(), SyncError>
where
    M: LocalMatrix<T>,
    T: Float,
{
    let mut sigma = T::zero();
    let mut diag = T::zero();
    for (j, v) in a.row(i) {
        if j == i {
            diag = diag + v;
        } else {
            sigma = sigma + v * x[j];
        }
    }
    if diag == T::zero() {
        return Err(SyncError::ZeroPivot(i));
    }
    x[i] = (T::one() - omega) * x[i] + omega * (b[i] - sigma) / diag;
    Ok(())
}

/// One forward (lower) SOR half-sweep, rows in ascending order.
pub fn sor_forward<M, T>(a: &M, x: &mut [T], b: &[T], omega: T) -> Result<(), SyncError>
where
    M: LocalMatrix<T>,
    T: Float,
{
    check_shapes(a, x, b)?;
    for i in 0..x.len() {
        relax_row(a, x, b, omega, i)?;
    }
    Ok(())
}

/// One backward (upper) SOR half-sweep, rows in descending order.
pub fn sor_backward<M, T>(a: &M, x: &mut [T], b: &[T], omega: T) -> Result<(), SyncError>
where
    M: LocalMatrix<T>,
    T: Float,
{
    check_shapes(a, x, b)?;
    for i in (0..x.len()).rev() {
        relax_row(a, x, b, omega, i)?;
    }
    Ok(())
}

/// One damped Jacobi step x ← x + ω D⁻¹ (b - A x) with a precomputed D⁻¹.
pub fn jacobi_step<M, T>(a: &M, x: &mut [T], b: &[T], inv_diag: &[T], omega: T) -> Result<(), SyncError>
where
    M: LocalMatrix<T>,
    T: Float,
{
    check_shapes(a, x, b)?;
    check_len(x.len(), inv_diag.len())?;
    let mut defect = b.to_vec();
    a.usmv(-T::one(), x, &mut defect);
    for ((xi, ri), &di) in x.iter_mut().zip(defect).zip(inv_diag) {
        *xi = *xi + omega * di * ri;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::CsrMatrix;
    use approx::assert_relative_eq;

    fn tridiag(n: usize) -> CsrMatrix<f64> {
        let mut t = Vec::new();
        for i in 0..n {
            t.push((i, i, 4.0));
            if i > 0 {
                t.push((i, i - 1, -1.0));
            }
            if i + 1 < n {
                t.push((i, i + 1, -1.0));
            }
        }
        CsrMatrix::from_triplets(n, n, &t).unwrap()
    }

    #[test]
    fn forward_sweep_matches_gauss_seidel() {
        let n = 5;
        let a = tridiag(n);
        let b = vec![1.0; n];
        let mut x = vec![0.0; n];
        sor_forward(&a, &mut x, &b, 1.0).unwrap();
        let mut expected = vec![0.0; n];
        for i in 0..n {
            let left = if i > 0 { expected[i - 1] } else { 0.0 };
            expected[i] = (b[i] + left) / 4.0;
        }
        assert_relative_eq!(x.as_slice(), expected.as_slice(), epsilon = 1e-12);
    }

    #[test]
    fn backward_sweep_starts_at_the_last_row() {
        let a = tridiag(3);
        let mut x = vec![0.0; 3];
        sor_backward(&a, &mut x, &[0.0, 0.0, 4.0], 1.0).unwrap();
        assert_relative_eq!(x[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn jacobi_step_on_diagonal_system_is_exact() {
        let a = CsrMatrix::from_triplets(2, 2, &[(0, 0, 2.0), (1, 1, 4.0)]).unwrap();
        let mut x = vec![0.0; 2];
        jacobi_step(&a, &mut x, &[2.0, 2.0], &[0.5, 0.25], 1.0).unwrap();
        assert_relative_eq!(x.as_slice(), [1.0, 0.5].as_slice(), epsilon = 1e-12);
    }

    #[test]
    fn zero_diagonal_is_reported() {
        let a = CsrMatrix::from_triplets(2, 2, &[(0, 1, 1.0), (1, 0, 1.0)]).unwrap();
        let mut x = vec![0.0; 2];
        assert!(matches!(sor_forward(&a, &mut x, &[1.0, 1.0], 1.0), Err(SyncError::ZeroPivot(0))));
    }
}
