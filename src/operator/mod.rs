//! Matrix-backed linear operators for sequential and overlapping Schwarz settings.

pub mod adapter;
pub mod schwarz;

pub use adapter::MatrixAdapter;
pub use schwarz::OverlappingSchwarzOperator;
