#![forbid(unsafe_code)]
//! sortmerge: map-side sort-merge join over pre-sorted inputs.
//!
//! Re-exports the workspace crates under one roof.

pub use sortmerge_core;
pub use sortmerge_exec;
pub use sortmerge_io;
pub use sortmerge_operators;

pub use sortmerge_core::prelude::*;
pub use sortmerge_exec::{run_join, JobSpec};
pub use sortmerge_operators::{JoinPoll, LeftPoll, MergeJoin};
