//! Preconditioner context for overlapping Schwarz solvers.
//!
//! This module defines the `Smoother` enum describing the local relaxation
//! and its parameters, and the factories that turn it into a
//! [`Preconditioner`]. A sequential smoother is wrapped by
//! [`BlockPreconditioner`] when the solve runs on overlapping subdomains.
//!
//! # Example
//!
//! ```rust,ignore
//! use schwarz_sync::config::SchwarzOptions;
//! use schwarz_sync::context::pc_context::{build, Smoother};
//! let smoother = Smoother::<f64>::from_options(&SchwarzOptions::default())?;
//! let mut pc = build(&SchwarzOptions::default(), &matrix, &comm)?;
//! ```

use crate::config::{SchwarzOptions, SmootherKind};
use crate::core::traits::SolverCategory;
use crate::error::SyncError;
use crate::matrix::LocalMatrix;
use crate::parallel::{CommValue, ParallelInformation};
use crate::preconditioner::{BlockPreconditioner, MatSorType, Preconditioner, SeqJacobi, SeqSor};
use log::debug;
use num_traits::{Float, NumCast};

/// Local smoother and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Smoother<T> {
    /// Damped Jacobi.
    Jacobi { iterations: usize, omega: T },
    /// Forward SOR.
    Sor { iterations: usize, omega: T },
    /// Symmetric SOR (forward then backward sweep).
    Ssor { iterations: usize, omega: T },
}

impl<T: Float> Smoother<T> {
    pub fn from_options(opts: &SchwarzOptions) -> Result<Self, SyncError> {
        let omega = <T as NumCast>::from(opts.relaxation).ok_or_else(|| {
            SyncError::InvalidOption(format!("relaxation {} is not representable", opts.relaxation))
        })?;
        let iterations = opts.iterations;
        Ok(match opts.smoother {
            SmootherKind::Jacobi => Smoother::Jacobi { iterations, omega },
            SmootherKind::Sor => Smoother::Sor { iterations, omega },
            SmootherKind::Ssor => Smoother::Ssor { iterations, omega },
        })
    }

    pub fn kind(&self) -> SmootherKind {
        match self {
            Smoother::Jacobi { .. } => SmootherKind::Jacobi,
            Smoother::Sor { .. } => SmootherKind::Sor,
            Smoother::Ssor { .. } => SmootherKind::Ssor,
        }
    }
}

/// Build the sequential smoother described by `smoother` on the local matrix.
pub fn build_sequential<'a, M, T>(
    smoother: &Smoother<T>,
    matrix: &'a M,
) -> Result<Box<dyn Preconditioner<T> + 'a>, SyncError>
where
    M: LocalMatrix<T>,
    T: Float + 'a,
{
    debug!("building {} smoother on a {}x{} block", smoother.kind(), matrix.nrows(), matrix.ncols());
    Ok(match *smoother {
        Smoother::Jacobi { iterations, omega } => Box::new(SeqJacobi::new(matrix, iterations, omega)?),
        Smoother::Sor { iterations, omega } => {
            Box::new(SeqSor::new(matrix, iterations, omega, MatSorType::APPLY_LOWER)?)
        }
        Smoother::Ssor { iterations, omega } => Box::new(SeqSor::ssor(matrix, iterations, omega)?),
    })
}

/// Build the sequential smoother and wrap it for overlapping subdomains.
pub fn build_block<'a, M, P, T>(
    smoother: &Smoother<T>,
    matrix: &'a M,
    comm: &'a P,
) -> Result<BlockPreconditioner<'a, P, Box<dyn Preconditioner<T> + 'a>, T>, SyncError>
where
    M: LocalMatrix<T>,
    P: ParallelInformation,
    T: Float + CommValue + 'a,
{
    let inner = build_sequential(smoother, matrix)?;
    BlockPreconditioner::new(inner, comm)
}

/// Build the preconditioner `opts` asks for: a bare smoother for sequential
/// solves, a block-wrapped one for overlapping solves.
pub fn build<'a, M, P, T>(
    opts: &SchwarzOptions,
    matrix: &'a M,
    comm: &'a P,
) -> Result<Box<dyn Preconditioner<T> + 'a>, SyncError>
where
    M: LocalMatrix<T>,
    P: ParallelInformation,
    T: Float + CommValue + 'a,
{
    let smoother = Smoother::from_options(opts)?;
    match opts.category {
        SolverCategory::Sequential => build_sequential(&smoother, matrix),
        SolverCategory::Overlapping => Ok(Box::new(build_block(&smoother, matrix, comm)?)),
    }
}
