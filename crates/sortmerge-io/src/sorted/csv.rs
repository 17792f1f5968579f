//! Sorted store backed by a headed CSV file.
//!
//! The file must be sorted on the key columns. Seeks go through a sparse
//! index of byte positions, either loaded from the locator's index file or
//! built by one pass over the file when the store is opened.

use std::fs::File;
use std::path::{Path, PathBuf};

use sortmerge_core::config::SourceLocator;
use sortmerge_core::key::{JoinKey, KeySpec};
use sortmerge_core::schema::Schema;
use sortmerge_core::types::Row;
use tracing::debug;

use super::index::{SparseIndex, DEFAULT_INDEX_INTERVAL};
use super::{SortedSource, SourceCounters};
use crate::error::{Error, Result};
use crate::location::resolve_path;
use crate::readers::csv::parse_record;

struct OpenFile {
    path: PathBuf,
    rdr: csv::Reader<File>,
    /// Position of the first data row, just past the header.
    start: csv::Position,
    index: SparseIndex,
    record: csv::StringRecord,
}

pub struct CsvSortedSource {
    schema: Schema,
    key: KeySpec,
    interval: usize,
    file: Option<OpenFile>,
    counters: SourceCounters,
}

impl CsvSortedSource {
    pub fn new(schema: Schema, key: KeySpec) -> Self {
        Self {
            schema,
            key,
            interval: DEFAULT_INDEX_INTERVAL,
            file: None,
            counters: SourceCounters::default(),
        }
    }

    /// Rows between index entries when the index is built on open.
    pub fn with_index_interval(mut self, interval: usize) -> Self {
        self.interval = interval.max(1);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn counters(&self) -> SourceCounters {
        self.counters
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Index in use, once opened.
    pub fn index(&self) -> Option<&SparseIndex> {
        self.file.as_ref().map(|f| &f.index)
    }

    /// Scan a sorted CSV file and build its sparse index.
    pub fn build_index(
        path: impl AsRef<Path>,
        schema: &Schema,
        key: &KeySpec,
        interval: usize,
    ) -> Result<SparseIndex> {
        let mut rdr = open_reader(path.as_ref(), schema)?;
        let mut index = SparseIndex::new(interval);
        let mut record = csv::StringRecord::new();
        loop {
            let pos = rdr.position().clone();
            if !rdr.read_record(&mut record)? {
                break;
            }
            let row = parse_record(&record, schema, pos.record())?;
            let k = key.project(&row)?;
            index.offer(&k, pos.byte(), pos.line(), pos.record());
        }
        Ok(index)
    }
}

fn open_reader(path: &Path, schema: &Schema) -> Result<csv::Reader<File>> {
    let f = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(f);
    let width = rdr.headers()?.len();
    if width != schema.len() {
        return Err(Error::Parse {
            record: 0,
            message: format!(
                "{}: header has {width} columns, schema has {}",
                path.display(),
                schema.len()
            ),
        });
    }
    Ok(rdr)
}

impl SortedSource for CsvSortedSource {
    fn open(&mut self, locator: &SourceLocator) -> Result<()> {
        let path = resolve_path(&locator.location)?;
        let index = match &locator.index_file {
            Some(idx) => SparseIndex::load(resolve_path(idx)?)?,
            None => Self::build_index(&path, &self.schema, &self.key, self.interval)?,
        };
        let rdr = open_reader(&path, &self.schema)?;
        let start = rdr.position().clone();
        debug!(
            path = %path.display(),
            index_entries = index.len(),
            index_loaded = locator.index_file.is_some(),
            signature = locator.signature.as_deref().unwrap_or(""),
            "csv source opened"
        );
        self.file = Some(OpenFile {
            path,
            rdr,
            start,
            index,
            record: csv::StringRecord::new(),
        });
        self.counters.opens += 1;
        Ok(())
    }

    fn seek_near(&mut self, key: &JoinKey) -> Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::NotOpen("csv source".into()))?;
        let target = match file.index.lookup(key) {
            Some(e) => {
                let mut pos = csv::Position::new();
                pos.set_byte(e.byte).set_line(e.line).set_record(e.record);
                pos
            }
            None => file.start.clone(),
        };
        debug!(path = %file.path.display(), %key, byte = target.byte(), "csv seek");
        file.rdr.seek(target)?;
        self.counters.seeks += 1;
        Ok(())
    }

    fn get_next(&mut self) -> Result<Option<Row>> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::NotOpen("csv source".into()))?;
        let record_no = file.rdr.position().record();
        if !file.rdr.read_record(&mut file.record)? {
            return Ok(None);
        }
        self.counters.reads += 1;
        parse_record(&file.record, &self.schema, record_no).map(Some)
    }

    fn close(&mut self) -> Result<()> {
        if self.file.take().is_some() {
            self.counters.closes += 1;
        }
        Ok(())
    }
}
