//! Aggregate maps and their publication across process boundaries.

pub mod gather_scatter;
pub mod global;
pub mod map;
pub mod publisher;

pub use gather_scatter::AggregatesGatherScatter;
pub use global::{GlobalAggregatesMap, ISOLATED_MARKER};
pub use map::{AggregateState, AggregatesMap};
pub use publisher::{
    publish_aggregates, AggregatesPublisher, DistributedPublisher, PublishStrategy, SequentialPublisher,
};
