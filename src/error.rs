use thiserror::Error;

// Unified error type for schwarz-sync

#[derive(Error, Debug)]
pub enum SyncError {
    /// An upstream contract was broken (coarsening heuristic, index set
    /// construction, solver driver). Never recoverable locally.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("collective mismatch on rank {rank}: expected {expected} but rank {peer} sent {found}")]
    CollectiveMismatch {
        rank: usize,
        peer: usize,
        expected: String,
        found: String,
    },
    #[error("communication error: {0}")]
    Communication(String),
    #[error("invalid index set: {0}")]
    InvalidIndexSet(String),
    #[error("dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("zero pivot at row {0}")]
    ZeroPivot(usize),
    #[error("invalid option: {0}")]
    InvalidOption(String),
}
