//! Core traits shared by operators, scalar products and preconditioners.

pub mod traits;

pub use traits::{AssembledLinearOperator, LinearOperator, ScalarProduct, SolverCategory};
