// CSR storage for local matrices

use super::LocalMatrix;
use crate::error::SyncError;
use faer::sparse::{
    SparseRowMat,            // owning numeric CSR
    SymbolicSparseRowMat,    // owning symbolic CSR
};
use num_traits::Float;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub struct CsrMatrix<T> {
    inner: SparseRowMat<usize, T>,
}

impl<T: Float> CsrMatrix<T> {
    /// Build a CSR from raw row-ptr, col-idx, and values.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, SyncError> {
        if row_ptr.len() != nrows + 1 {
            return Err(SyncError::DimensionMismatch { expected: nrows + 1, found: row_ptr.len() });
        }
        if row_ptr[0] != 0 || row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(SyncError::InvalidOption("row pointers must start at 0 and be non-decreasing".into()));
        }
        let nnz = row_ptr[nrows];
        if col_idx.len() != nnz || values.len() != nnz {
            return Err(SyncError::DimensionMismatch { expected: nnz, found: col_idx.len().min(values.len()) });
        }
        if let Some(&j) = col_idx.iter().find(|&&j| j >= ncols) {
            return Err(SyncError::DimensionMismatch { expected: ncols, found: j + 1 });
        }
        for i in 0..nrows {
            let cols = &col_idx[row_ptr[i]..row_ptr[i + 1]];
            if cols.windows(2).any(|w| w[0] >= w[1]) {
                return Err(SyncError::InvalidOption(format!("columns of row {i} must be strictly increasing")));
            }
        }
        // second argument `None`: no separate row_nnz, rows are contiguous
        let symbolic = SymbolicSparseRowMat::new_checked(nrows, ncols, row_ptr, None, col_idx);
        let inner = SparseRowMat::new(symbolic, values);
        Ok(Self { inner })
    }

    /// Build from `(row, col, value)` triplets; duplicates are summed.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, T)]) -> Result<Self, SyncError> {
        let mut sorted = triplets.to_vec();
        sorted.sort_by_key(|&(i, j, _)| (i, j));
        let mut row_ptr = vec![0usize; nrows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<T> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;
        for (i, j, v) in sorted {
            if i >= nrows {
                return Err(SyncError::DimensionMismatch { expected: nrows, found: i + 1 });
            }
            if last == Some((i, j)) {
                if let Some(acc) = values.last_mut() {
                    *acc = *acc + v;
                }
                continue;
            }
            col_idx.push(j);
            values.push(v);
            row_ptr[i + 1] += 1;
            last = Some((i, j));
        }
        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }
        Self::from_csr(nrows, ncols, row_ptr, col_idx, values)
    }

    pub fn nnz(&self) -> usize {
        self.inner.val().len()
    }

    fn row_range(&self, i: usize) -> std::ops::Range<usize> {
        let row_ptr = self.inner.symbolic().row_ptr();
        row_ptr[i]..row_ptr[i + 1]
    }
}

#[cfg(not(feature = "rayon"))]
impl<T: Float> LocalMatrix<T> for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.inner.nrows()
    }
    fn ncols(&self) -> usize {
        self.inner.ncols()
    }
    fn row(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_range(i);
        let cols = &self.inner.symbolic().col_idx()[range.clone()];
        let vals = &self.inner.val()[range];
        cols.iter().copied().zip(vals.iter().copied())
    }
}

#[cfg(feature = "rayon")]
impl<T: Float + Send + Sync> LocalMatrix<T> for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.inner.nrows()
    }
    fn ncols(&self) -> usize {
        self.inner.ncols()
    }
    fn row(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_range(i);
        let cols = &self.inner.symbolic().col_idx()[range.clone()];
        let vals = &self.inner.val()[range];
        cols.iter().copied().zip(vals.iter().copied())
    }
    /// Row-parallel y ← y + α A x using Rayon
    fn usmv(&self, alpha: T, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols());
        assert_eq!(y.len(), self.nrows());
        y.par_iter_mut().enumerate().for_each(|(i, yi)| {
            let sum = self.row(i).fold(T::zero(), |acc, (j, v)| acc + v * x[j]);
            *yi = *yi + alpha * sum;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_umv_accumulates() {
        // 3×3 identity in CSR: row_ptr=[0,1,2,3], col_idx=[0,1,2], vals=[1,1,1]
        let m = CsrMatrix::from_csr(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![1.0, 1.0, 1.0]).unwrap();
        let x = vec![2.0, 3.0, 5.0];
        let mut y = vec![1.0; 3];
        m.umv(&x, &mut y);
        assert_eq!(y, vec![3.0, 4.0, 6.0]);
    }

    #[test]
    fn simple_pattern_scaled() {
        // 2×3 matrix [[1,2,0],[0,3,4]]
        let m = CsrMatrix::from_csr(2, 3, vec![0, 2, 4], vec![0, 1, 1, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let x = vec![1.0, 1.0, 1.0];
        let mut y = vec![0.0; 2];
        m.usmv(2.0, &x, &mut y);
        assert_eq!(y, vec![6.0, 14.0]);
        assert_eq!(m.diagonal(1), 3.0);
        assert_eq!(m.row(1).collect::<Vec<_>>(), vec![(1, 3.0), (2, 4.0)]);
    }

    #[test]
    fn triplets_sum_duplicates() {
        let m = CsrMatrix::from_triplets(2, 2, &[(1, 1, 1.0), (0, 0, 2.0), (1, 1, 0.5), (1, 0, -1.0)]).unwrap();
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.diagonal(1), 1.5);
        assert!(CsrMatrix::<f64>::from_triplets(1, 1, &[(0, 3, 1.0)]).is_err());
        assert!(CsrMatrix::<f64>::from_csr(2, 2, vec![0, 1], vec![0], vec![1.0]).is_err());
    }
}
