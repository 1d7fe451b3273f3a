//! Index sets of an owner/overlap/copy partition.

pub mod index_set;
pub mod lookup;
pub mod remote;

pub use index_set::{Attribute, GlobalIndex, IndexPair, LocalIndex, ParallelIndexSet};
pub use lookup::GlobalLookupIndexSet;
pub use remote::{Interface, InterfaceLink, RemoteIndex, RemoteIndices};
