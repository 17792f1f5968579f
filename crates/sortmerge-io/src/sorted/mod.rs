//! Random-access, key-ordered stores the join reads its right side from.
//!
//! A store is opened against a [`SourceLocator`], can be repositioned near a
//! key, and is then read forward one row at a time. Seeking is coarse: after
//! `seek_near(k)` the store sits at or before the first row whose key is
//! `>= k`, so callers still scan and compare.

pub mod csv;
pub mod index;
pub mod memory;

use serde::{Deserialize, Serialize};
use sortmerge_core::config::SourceLocator;
use sortmerge_core::key::JoinKey;
use sortmerge_core::types::Row;

use crate::error::Result;

pub use self::csv::CsvSortedSource;
pub use index::{IndexEntry, SparseIndex, DEFAULT_INDEX_INTERVAL};
pub use memory::MemorySortedSource;

pub trait SortedSource {
    /// Bind the store to `locator` and position it at the first row.
    fn open(&mut self, locator: &SourceLocator) -> Result<()>;

    /// Reposition at or before the first row with key `>= key`.
    fn seek_near(&mut self, key: &JoinKey) -> Result<()>;

    /// Next row in key order, `None` once exhausted.
    fn get_next(&mut self) -> Result<Option<Row>>;

    /// Release the underlying resource.
    fn close(&mut self) -> Result<()>;
}

impl<T: SortedSource + ?Sized> SortedSource for Box<T> {
    fn open(&mut self, locator: &SourceLocator) -> Result<()> {
        (**self).open(locator)
    }

    fn seek_near(&mut self, key: &JoinKey) -> Result<()> {
        (**self).seek_near(key)
    }

    fn get_next(&mut self) -> Result<Option<Row>> {
        (**self).get_next()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Operation counters kept by the bundled stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounters {
    pub opens: u64,
    pub seeks: u64,
    pub reads: u64,
    pub closes: u64,
}
