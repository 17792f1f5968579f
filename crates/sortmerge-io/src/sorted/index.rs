//! Sparse key index over a sorted store.
//!
//! One entry every `interval` rows records the key of that row and where the
//! row starts. Lookups return the last entry whose key is strictly below the
//! target, which is always at or before the first row `>= target`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sortmerge_core::key::JoinKey;

use crate::error::{Error, Result};

pub const DEFAULT_INDEX_INTERVAL: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub key: JoinKey,
    /// Byte offset of the row; zero for in-memory stores.
    pub byte: u64,
    pub line: u64,
    /// Ordinal of the row within the store.
    pub record: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseIndex {
    pub interval: usize,
    pub entries: Vec<IndexEntry>,
    #[serde(skip)]
    since_last: usize,
}

impl SparseIndex {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            entries: Vec::new(),
            since_last: usize::MAX,
        }
    }

    /// Offer the next row of the store in order. Rows with unjoinable keys
    /// are never indexed; the next joinable row takes the slot instead.
    pub fn offer(&mut self, key: &JoinKey, byte: u64, line: u64, record: u64) {
        self.since_last = self.since_last.saturating_add(1);
        if self.since_last < self.interval || !key.is_joinable() {
            return;
        }
        if let Some(last) = self.entries.last() {
            // Keep entries strictly ascending so lookups can bisect.
            if *key <= last.key {
                return;
            }
        }
        self.entries.push(IndexEntry {
            key: key.clone(),
            byte,
            line,
            record,
        });
        self.since_last = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last entry with key `< target`, or `None` to start from the top.
    pub fn lookup(&self, target: &JoinKey) -> Option<&IndexEntry> {
        let n = self.entries.partition_point(|e| e.key < *target);
        n.checked_sub(1).map(|i| &self.entries[i])
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)?;
        let mut idx: SparseIndex = serde_json::from_reader(BufReader::new(f))?;
        if idx.interval == 0 {
            return Err(Error::Parse {
                record: 0,
                message: format!("index {} has zero interval", path.display()),
            });
        }
        idx.since_last = usize::MAX;
        Ok(idx)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let f = File::create(path)?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }
}
