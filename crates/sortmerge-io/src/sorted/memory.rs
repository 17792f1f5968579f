//! In-memory sorted store.
//!
//! Holds its rows in a `Vec` with a sparse index over them. Useful for tests
//! and for small right sides that fit in memory. Failure injection and a
//! strict seek mode let callers exercise error paths deterministically.

use sortmerge_core::config::SourceLocator;
use sortmerge_core::key::{JoinKey, KeySpec};
use sortmerge_core::types::Row;
use tracing::debug;

use super::index::{SparseIndex, DEFAULT_INDEX_INTERVAL};
use super::{SortedSource, SourceCounters};
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct MemorySortedSource {
    rows: Vec<Row>,
    key: KeySpec,
    index: SparseIndex,
    pos: usize,
    open: bool,
    signature: Option<String>,

    strict_seeks: bool,
    last_was_seek: bool,
    fail_close: bool,
    fail_reads_after: Option<u64>,

    counters: SourceCounters,
}

impl MemorySortedSource {
    /// Rows must already be in key order; keys are projected once here to
    /// build the index.
    pub fn new(rows: Vec<Row>, key: KeySpec) -> Result<Self> {
        let index = build_index(&rows, &key, DEFAULT_INDEX_INTERVAL)?;
        Ok(Self {
            rows,
            key,
            index,
            pos: 0,
            open: false,
            signature: None,
            strict_seeks: false,
            last_was_seek: false,
            fail_close: false,
            fail_reads_after: None,
            counters: SourceCounters::default(),
        })
    }

    pub fn with_index_interval(mut self, interval: usize) -> Result<Self> {
        self.index = build_index(&self.rows, &self.key, interval)?;
        Ok(self)
    }

    /// Reject a seek that directly follows another seek.
    pub fn strict_seeks(mut self) -> Self {
        self.strict_seeks = true;
        self
    }

    /// Make `close` report a failure (the source still ends up closed).
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Fail every read after `n` successful ones.
    pub fn failing_reads_after(mut self, n: u64) -> Self {
        self.fail_reads_after = Some(n);
        self
    }

    pub fn counters(&self) -> SourceCounters {
        self.counters
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Ordinal of the next row `get_next` would return.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Signature the store was last opened with.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn index(&self) -> &SparseIndex {
        &self.index
    }
}

fn build_index(rows: &[Row], key: &KeySpec, interval: usize) -> Result<SparseIndex> {
    let mut index = SparseIndex::new(interval);
    for (i, row) in rows.iter().enumerate() {
        let k = key.project(row)?;
        index.offer(&k, 0, 0, i as u64);
    }
    Ok(index)
}

impl SortedSource for MemorySortedSource {
    fn open(&mut self, locator: &SourceLocator) -> Result<()> {
        self.pos = 0;
        self.open = true;
        self.last_was_seek = false;
        self.signature = locator.signature.clone();
        self.counters.opens += 1;
        debug!(
            rows = self.rows.len(),
            index_entries = self.index.len(),
            "memory source opened"
        );
        Ok(())
    }

    fn seek_near(&mut self, key: &JoinKey) -> Result<()> {
        if !self.open {
            return Err(Error::NotOpen("memory source".into()));
        }
        if self.strict_seeks && self.last_was_seek {
            return Err(Error::SeekRejected(format!(
                "seek to {key} without a read since the previous seek"
            )));
        }
        self.pos = self.index.lookup(key).map_or(0, |e| e.record as usize);
        self.last_was_seek = true;
        self.counters.seeks += 1;
        Ok(())
    }

    fn get_next(&mut self) -> Result<Option<Row>> {
        if !self.open {
            return Err(Error::NotOpen("memory source".into()));
        }
        if let Some(limit) = self.fail_reads_after {
            if self.counters.reads >= limit {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "injected read failure",
                )));
            }
        }
        self.last_was_seek = false;
        let row = self.rows.get(self.pos).cloned();
        if row.is_some() {
            self.pos += 1;
            self.counters.reads += 1;
        }
        Ok(row)
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        self.counters.closes += 1;
        if self.fail_close {
            return Err(Error::Close("injected close failure".into()));
        }
        Ok(())
    }
}
