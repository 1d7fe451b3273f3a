//! Preconditioners for linear solvers.
//!
//! This module defines the `Preconditioner` state machine (`pre` → `apply`* → `post`),
//! the local relaxation primitives, sequential smoothers (SOR/SSOR, Jacobi) and the
//! wrappers that make their results consistent across overlapping subdomains.

use crate::core::traits::SolverCategory;
use crate::error::SyncError;

/// A preconditioner M ≈ A⁻¹, used as `pre`, then `apply` any number of times, then `post`.
pub trait Preconditioner<T> {
    /// Prepare for a solve with initial guess `x` and right-hand side `b`.
    fn pre(&mut self, _x: &mut [T], _b: &mut [T]) -> Result<(), SyncError> {
        Ok(())
    }
    /// Compute an update `v ≈ M⁻¹ d` for the defect `d`.
    fn apply(&mut self, v: &mut [T], d: &[T]) -> Result<(), SyncError>;
    /// Clean up after the solve.
    fn post(&mut self, _x: &mut [T]) -> Result<(), SyncError> {
        Ok(())
    }
    fn category(&self) -> SolverCategory {
        SolverCategory::Sequential
    }
}

impl<T, P: Preconditioner<T> + ?Sized> Preconditioner<T> for &mut P {
    fn pre(&mut self, x: &mut [T], b: &mut [T]) -> Result<(), SyncError> {
        (**self).pre(x, b)
    }
    fn apply(&mut self, v: &mut [T], d: &[T]) -> Result<(), SyncError> {
        (**self).apply(v, d)
    }
    fn post(&mut self, x: &mut [T]) -> Result<(), SyncError> {
        (**self).post(x)
    }
    fn category(&self) -> SolverCategory {
        (**self).category()
    }
}

impl<T, P: Preconditioner<T> + ?Sized> Preconditioner<T> for Box<P> {
    fn pre(&mut self, x: &mut [T], b: &mut [T]) -> Result<(), SyncError> {
        (**self).pre(x, b)
    }
    fn apply(&mut self, v: &mut [T], d: &[T]) -> Result<(), SyncError> {
        (**self).apply(v, d)
    }
    fn post(&mut self, x: &mut [T]) -> Result<(), SyncError> {
        (**self).post(x)
    }
    fn category(&self) -> SolverCategory {
        (**self).category()
    }
}

// Submodules for various preconditioners
pub mod block;
pub mod jacobi;
pub mod par_ssor;
pub mod relaxation;
pub mod sor;

// Re-exports for convenience
pub use block::BlockPreconditioner;
pub use jacobi::SeqJacobi;
pub use par_ssor::ParSsor;
pub use sor::{MatSorType, SeqSor};
