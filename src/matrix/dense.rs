//! Dense local matrices on top of Faer.
//!
//! Useful for small subdomains and for tests; every entry of a row is
//! reported, zeros included.

use super::LocalMatrix;
use faer::Mat;
use num_traits::Float;

impl<T: Float> LocalMatrix<T> for Mat<T> {
    fn nrows(&self) -> usize {
        Mat::nrows(self)
    }
    fn ncols(&self) -> usize {
        Mat::ncols(self)
    }
    fn row(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        (0..Mat::ncols(self)).map(move |j| (j, self[(i, j)]))
    }
    fn diagonal(&self, i: usize) -> T {
        self[(i, i)]
    }
}
