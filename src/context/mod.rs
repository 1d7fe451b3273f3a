//! Context module: preconditioner configuration and factories.
//!
//! - [`pc_context`]: the `Smoother` description and the functions that build
//!   sequential smoothers and their block-wrapped parallel counterparts.

pub mod pc_context;
pub use pc_context::{build, build_block, build_sequential, Smoother};
