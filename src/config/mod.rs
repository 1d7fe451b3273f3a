//! Option structs for assembling a Schwarz smoother pipeline.

pub mod options;

pub use options::{SchwarzOptions, SmootherKind};
