//! Matrix module: the local matrix contract and its sparse and dense implementations.

use num_traits::Float;

pub mod dense;
pub mod sparse;

pub use sparse::CsrMatrix;

/// A process-local matrix: the rows this process assembled, in local numbering.
pub trait LocalMatrix<T: Float> {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
    /// Stored entries of row `i` as `(column, value)`.
    fn row(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_;

    /// Diagonal entry of row `i` (zero if not stored).
    fn diagonal(&self, i: usize) -> T {
        self.row(i).filter(|&(j, _)| j == i).fold(T::zero(), |acc, (_, v)| acc + v)
    }

    /// y ← y + A x.  `x.len() == ncols()`, `y.len() == nrows()`.
    fn umv(&self, x: &[T], y: &mut [T]) {
        self.usmv(T::one(), x, y);
    }

    /// y ← y + α A x.
    fn usmv(&self, alpha: T, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols());
        assert_eq!(y.len(), self.nrows());
        for (i, yi) in y.iter_mut().enumerate() {
            let sum = self.row(i).fold(T::zero(), |acc, (j, v)| acc + v * x[j]);
            *yi = *yi + alpha * sum;
        }
    }
}
