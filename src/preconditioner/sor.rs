use std::fmt;
use bitflags::bitflags;
use crate::preconditioner::Preconditioner;
use crate::preconditioner::relaxation::{sor_backward, sor_forward};
use crate::core::traits::check_len;
use crate::matrix::LocalMatrix;
use crate::error::SyncError;
use num_traits::Float;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct MatSorType: u32 {
        const ZERO_INITIAL_GUESS       = 0b0000_0001;
        const APPLY_LOWER              = 0b0000_0010; // forward Gauss–Seidel
        const APPLY_UPPER              = 0b0000_0100; // backward
        const SYMMETRIC_SWEEP          = Self::APPLY_LOWER.bits() | Self::APPLY_UPPER.bits();
    }
}

/// Sequential SOR/SSOR smoother over a local matrix.
pub struct SeqSor<'a, M, T> {
    matrix: &'a M,
    its:    usize,
    omega:  T,
    sym:    MatSorType,
}

impl<'a, M, T> SeqSor<'a, M, T>
where
    M: LocalMatrix<T>,
    T: Float,
{
    /// Checks that `matrix` is square with a non-zero diagonal.
    pub fn new(matrix: &'a M, its: usize, omega: T, sym: MatSorType) -> Result<Self, SyncError> {
        check_len(matrix.nrows(), matrix.ncols())?;
        if let Some(i) = (0..matrix.nrows()).find(|&i| matrix.diagonal(i) == T::zero()) {
            return Err(SyncError::ZeroPivot(i));
        }
        Ok(Self { matrix, its, omega, sym })
    }
    /// Symmetric (forward then backward) sweeps.
    pub fn ssor(matrix: &'a M, its: usize, omega: T) -> Result<Self, SyncError> {
        Self::new(matrix, its, omega, MatSorType::SYMMETRIC_SWEEP)
    }
    pub fn set_omega(&mut self, omega: T) { self.omega = omega; }
    pub fn omega(&self) -> T { self.omega }
    pub fn set_its(&mut self, its: usize) { self.its = its; }
    pub fn its(&self) -> usize { self.its }
    pub fn set_sym(&mut self, sym: MatSorType) { self.sym = sym; }
    pub fn sym(&self) -> MatSorType { self.sym }
}

impl<M, T> fmt::Display for SeqSor<'_, M, T>
where
    T: Float + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SOR(omega={}, its={}, sym={:?})", self.omega, self.its, self.sym)
    }
}

impl<M, T> Preconditioner<T> for SeqSor<'_, M, T>
where
    M: LocalMatrix<T>,
    T: Float,
{
    fn apply(&mut self, v: &mut [T], d: &[T]) -> Result<(), SyncError> {
        if self.sym.contains(MatSorType::ZERO_INITIAL_GUESS) {
            v.fill(T::zero());
        }
        for _ in 0..self.its {
            // FORWARD sweep
            if self.sym.contains(MatSorType::APPLY_LOWER) {
                sor_forward(self.matrix, v, d, self.omega)?;
            }
            // BACKWARD sweep
            if self.sym.contains(MatSorType::APPLY_UPPER) {
                sor_backward(self.matrix, v, d, self.omega)?;
            }
        }
        Ok(())
    }
}
