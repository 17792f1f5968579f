#![forbid(unsafe_code)]
//! sortmerge-operators: the map-side merge join and its collaborators.
//!
//! Design intent:
//! - Pure and synchronous. The engine is a pull-driven state machine; every
//!   suspension point is a return from `MergeJoin::produce_next`.
//! - Right-side rows come from a `sortmerge_io::SortedSource` wrapped in a
//!   `RightSource` adapter, optionally filtered/projected first.
//! - Each operator exposes a planning surface (`OpPlan`) so callers can
//!   derive output schemas before running anything.

pub mod key;
pub mod plan;
pub mod traits;

pub mod join;
pub mod transform;

pub use join::{
    JoinPoll, LeftBuffer, LeftInput, LeftPoll, MergeJoin, RightSource, RowCombiner,
};
pub use key::KeyExtractor;
pub use plan::{Footprint, OpPlan};
pub use traits::{OpError, Operator, Side};
pub use transform::{Filter, Project, RowTransform, TransformPipeline};
