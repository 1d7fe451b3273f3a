//! schwarz-sync: owner-to-all synchronization for overlapping Schwarz solvers
//!
//! This crate provides the communication objects, operators, scalar products and
//! preconditioner wrappers that keep process-local data consistent across
//! overlapping subdomains, and publishes aggregate assignments (for algebraic
//! multigrid coarsening) from owners to every replica.

pub mod parallel;

pub mod aggregates;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod index;
pub mod matrix;
pub mod operator;
pub mod preconditioner;
pub mod scalar_product;

// Re-exports for convenience
pub use aggregates::*;
pub use config::*;
pub use context::*;
pub use self::core::*;
pub use error::*;
pub use index::*;
pub use matrix::*;
pub use operator::*;
pub use parallel::*;
pub use preconditioner::*;
pub use scalar_product::*;
