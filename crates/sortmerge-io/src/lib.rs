#![forbid(unsafe_code)]
//! sortmerge-io: the right-side sorted stores the join seeks into, plus
//! row readers/writers used by the driver and CLI.
//!
//! - `sorted`: the `SortedSource` trait, a sparse key index, and in-memory
//!   and CSV-backed stores.
//! - `readers` / `writers`: typed CSV rows in, CSV or NDJSON rows out.

pub mod error;
pub mod location;
pub mod readers;
pub mod sorted;
pub mod writers;

pub use error::{Error, Result};
pub use sorted::{CsvSortedSource, MemorySortedSource, SortedSource, SparseIndex};
