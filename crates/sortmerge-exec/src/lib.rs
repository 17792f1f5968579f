#![forbid(unsafe_code)]
//! sortmerge-exec: drives a `MergeJoin` to completion and reports on it.
//!
//! - `runtime`: the poll loop (`run_join`) and the run manifest.
//! - `input` / `sink`: where left rows come from and joined rows go.
//! - `job`: YAML job files that wire CSV inputs, the right-side store and an
//!   output together.

pub mod input;
pub mod job;
pub mod metrics;
pub mod runtime;
pub mod sink;

pub use input::{CsvLeftInput, VecLeftInput};
pub use job::JobSpec;
pub use runtime::{run_join, ExecError};
pub use sink::RowSink;
