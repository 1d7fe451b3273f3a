//! Command-line or API options for the overlapping Schwarz pipeline.
//!
//! `SchwarzOptions` selects the solver category (and with it the publisher
//! strategy, scalar product and operator flavour) plus the local smoother
//! and its parameters.

use crate::core::traits::SolverCategory;
use crate::error::SyncError;
use std::fmt;
use std::str::FromStr;

/// Local smoother family.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SmootherKind {
    Jacobi,
    /// Forward SOR sweeps
    Sor,
    /// Forward then backward SOR sweeps
    Ssor,
}

impl fmt::Display for SmootherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmootherKind::Jacobi => write!(f, "jacobi"),
            SmootherKind::Sor => write!(f, "sor"),
            SmootherKind::Ssor => write!(f, "ssor"),
        }
    }
}

impl FromStr for SmootherKind {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jacobi" => Ok(SmootherKind::Jacobi),
            "sor" | "gs" => Ok(SmootherKind::Sor),
            "ssor" | "sgs" => Ok(SmootherKind::Ssor),
            other => Err(SyncError::InvalidOption(format!("unknown smoother '{other}'"))),
        }
    }
}

/// Solver pipeline options.
#[derive(Debug, Clone, PartialEq)]
pub struct SchwarzOptions {
    /// Sequential or overlapping
    pub category: SolverCategory,

    /// Local smoother (jacobi, sor, ssor)
    pub smoother: SmootherKind,

    /// Smoother sweeps per application
    pub iterations: usize,

    /// Relaxation factor ω
    pub relaxation: f64,
}

impl Default for SchwarzOptions {
    fn default() -> Self {
        Self {
            category: SolverCategory::Overlapping,
            smoother: SmootherKind::Ssor,
            iterations: 1,
            relaxation: 1.0,
        }
    }
}

impl SchwarzOptions {
    /// Parse `key=value` pairs (`category`, `smoother`, `iterations`,
    /// `relaxation`) on top of the defaults.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut opts = Self::default();
        for (key, value) in pairs {
            match key.trim() {
                "category" => opts.category = value.parse()?,
                "smoother" => opts.smoother = value.parse()?,
                "iterations" => {
                    opts.iterations = value
                        .trim()
                        .parse()
                        .map_err(|e| SyncError::InvalidOption(format!("iterations '{value}': {e}")))?
                }
                "relaxation" => {
                    opts.relaxation = value
                        .trim()
                        .parse()
                        .map_err(|e| SyncError::InvalidOption(format!("relaxation '{value}': {e}")))?
                }
                other => return Err(SyncError::InvalidOption(format!("unknown option '{other}'"))),
            }
        }
        if !(opts.relaxation > 0.0 && opts.relaxation < 2.0) {
            return Err(SyncError::InvalidOption(format!(
                "relaxation {} outside (0, 2)",
                opts.relaxation
            )));
        }
        Ok(opts)
    }
}
