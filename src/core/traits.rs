//! Core operator traits for schwarz-sync.
//!
//! The capability sets an iterative driver needs: `{apply, apply_scale_add}` for
//! operators, `{dot, norm}` for scalar products. Preconditioners live in
//! [`crate::preconditioner`].

use crate::error::SyncError;
use std::fmt;
use std::str::FromStr;

/// How the data an object works on is distributed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SolverCategory {
    /// Single process, no replicated degrees of freedom.
    Sequential,
    /// Overlapping subdomains with owner/overlap/copy attributes.
    Overlapping,
}

impl fmt::Display for SolverCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverCategory::Sequential => write!(f, "sequential"),
            SolverCategory::Overlapping => write!(f, "overlapping"),
        }
    }
}

impl FromStr for SolverCategory {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(SolverCategory::Sequential),
            "overlapping" | "ovl" => Ok(SolverCategory::Overlapping),
            other => Err(SyncError::InvalidOption(format!("unknown solver category '{other}'"))),
        }
    }
}

/// A linear operator y ← A x.
pub trait LinearOperator<T> {
    /// Compute y = A · x.
    fn apply(&self, x: &[T], y: &mut [T]) -> Result<(), SyncError>;
    /// Compute y = y + α · A · x.
    fn apply_scale_add(&self, alpha: T, x: &[T], y: &mut [T]) -> Result<(), SyncError>;
    /// Distribution category of the operator.
    fn category(&self) -> SolverCategory;
}

/// An operator backed by an assembled matrix.
pub trait AssembledLinearOperator<T, M>: LinearOperator<T> {
    /// Read-only access to the underlying matrix.
    fn matrix(&self) -> &M;
}

/// Inner products & norms.
pub trait ScalarProduct<T> {
    /// Compute dot(x, y).
    fn dot(&self, x: &[T], y: &[T]) -> Result<T, SyncError>;
    /// Compute ‖x‖₂.
    fn norm(&self, x: &[T]) -> Result<T, SyncError>;
    /// Distribution category of the scalar product.
    fn category(&self) -> SolverCategory;
}

/// Return an error unless `found == expected`.
pub(crate) fn check_len(expected: usize, found: usize) -> Result<(), SyncError> {
    if expected != found {
        return Err(SyncError::DimensionMismatch { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_and_displays() {
        assert_eq!("overlapping".parse::<SolverCategory>().unwrap(), SolverCategory::Overlapping);
        assert_eq!(" SEQ ".parse::<SolverCategory>().unwrap(), SolverCategory::Sequential);
        assert!("nonoverlapping".parse::<SolverCategory>().is_err());
        assert_eq!(SolverCategory::Sequential.to_string(), "sequential");
    }
}
