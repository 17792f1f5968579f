//! Adapter over the seekable right-side store.
//!
//! Owns the store's lifecycle (open, seek, read, close) and runs each raw
//! row through the optional transform pipeline before handing it to the
//! join.

use sortmerge_core::prelude::{JoinKey, Row, SourceLocator};
use sortmerge_io::SortedSource;
use tracing::{debug, error};

use crate::transform::TransformPipeline;
use crate::traits::OpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unopened,
    Open,
    Closed,
}

pub struct RightSource<S: SortedSource> {
    source: S,
    locator: SourceLocator,
    pipeline: Option<TransformPipeline>,
    lifecycle: Lifecycle,
    /// A seek was issued and no read has followed it yet.
    seek_pending: bool,
    seeks: u64,
    raw_rows: u64,
}

impl<S: SortedSource> RightSource<S> {
    pub fn new(source: S, locator: SourceLocator) -> Self {
        Self {
            source,
            locator,
            pipeline: None,
            lifecycle: Lifecycle::Unopened,
            seek_pending: false,
            seeks: 0,
            raw_rows: 0,
        }
    }

    pub fn with_pipeline(mut self, pipeline: TransformPipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    /// Seeks actually issued to the store.
    pub fn seeks(&self) -> u64 {
        self.seeks
    }

    /// Rows pulled from the store, before any transform.
    pub fn raw_rows(&self) -> u64 {
        self.raw_rows
    }

    /// Bind the store to its locator and position it near `key`.
    pub fn open_near(&mut self, key: &JoinKey) -> Result<(), OpError> {
        debug!(location = %self.locator.location, %key, "opening right source");
        self.source.open(&self.locator)?;
        self.lifecycle = Lifecycle::Open;
        self.seek_pending = false;
        self.seek_near(key)?;
        Ok(())
    }

    /// Reposition at or before the first row with key `>= key`.
    ///
    /// Returns `false` when the seek was skipped because no row has been read
    /// since the previous seek: join keys only ascend, so the store is
    /// already positioned at or before `key`.
    pub fn seek_near(&mut self, key: &JoinKey) -> Result<bool, OpError> {
        if self.lifecycle != Lifecycle::Open {
            return Err(OpError::Exec(format!("seek to {key} on a right source that is not open")));
        }
        if self.seek_pending {
            debug!(%key, "right seek elided, no read since previous seek");
            return Ok(false);
        }
        self.source.seek_near(key)?;
        self.seeks += 1;
        self.seek_pending = true;
        debug!(%key, seeks = self.seeks, "right source repositioned");
        Ok(true)
    }

    /// Next transformed row, `None` at end of data or once closed.
    pub fn next(&mut self) -> Result<Option<Row>, OpError> {
        match self.lifecycle {
            Lifecycle::Unopened => {
                return Err(OpError::Exec("read from a right source that was never opened".into()))
            }
            Lifecycle::Closed => return Ok(None),
            Lifecycle::Open => {}
        }
        loop {
            let raw = self.source.get_next()?;
            self.seek_pending = false;
            let Some(row) = raw else {
                return Ok(None);
            };
            self.raw_rows += 1;
            match &self.pipeline {
                None => return Ok(Some(row)),
                Some(pipeline) => {
                    if let Some(out) = pipeline.apply(row)? {
                        return Ok(Some(out));
                    }
                }
            }
        }
    }

    /// Release the store. Safe to call repeatedly and before opening; close
    /// failures are logged and swallowed.
    pub fn close(&mut self) {
        if self.lifecycle != Lifecycle::Open {
            return;
        }
        self.lifecycle = Lifecycle::Closed;
        if let Err(e) = self.source.close() {
            error!(location = %self.locator.location, error = %e, "failed to close right source");
        } else {
            debug!(location = %self.locator.location, raw_rows = self.raw_rows, "right source closed");
        }
    }
}

impl<S: SortedSource> Drop for RightSource<S> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Filter, RowTransform};
    use sortmerge_core::prelude::{DataType, Field, KeySpec, Scalar, Schema};
    use sortmerge_io::MemorySortedSource;

    fn rows(keys: &[i64]) -> Vec<Row> {
        keys.iter()
            .map(|k| Row::new(vec![Scalar::I64(*k)]))
            .collect()
    }

    fn key(v: i64) -> JoinKey {
        JoinKey::Scalar(Scalar::I64(v))
    }

    fn adapter(keys: &[i64]) -> RightSource<MemorySortedSource> {
        let src = MemorySortedSource::new(rows(keys), KeySpec::column(0, DataType::Int64))
            .unwrap()
            .with_index_interval(1)
            .unwrap()
            .strict_seeks();
        RightSource::new(src, SourceLocator::new("mem://right"))
    }

    #[test]
    fn back_to_back_seeks_are_elided() {
        let mut r = adapter(&[1, 2, 3, 4]);
        r.open_near(&key(2)).unwrap();
        assert!(!r.seek_near(&key(3)).unwrap());
        assert_eq!(r.seeks(), 1);
        r.next().unwrap();
        assert!(r.seek_near(&key(4)).unwrap());
        assert_eq!(r.source().counters().seeks, 2);
    }

    #[test]
    fn pipeline_rejects_trigger_more_raw_reads() {
        let schema = Schema::new(vec![Field::new("k", DataType::Int64, false)]);
        let stages: Vec<Box<dyn RowTransform>> =
            vec![Box::new(Filter::parse("k > 2", &schema).unwrap())];
        let mut r = adapter(&[1, 2, 3]).with_pipeline(TransformPipeline::new(stages).unwrap());
        r.open_near(&key(1)).unwrap();
        assert_eq!(r.next().unwrap(), Some(Row::new(vec![Scalar::I64(3)])));
        assert_eq!(r.raw_rows(), 3);
        assert_eq!(r.next().unwrap(), None);
    }

    #[test]
    fn close_is_idempotent_and_safe_unopened() {
        let mut r = adapter(&[1]);
        r.close();
        assert_eq!(r.source().counters().closes, 0);
        r.open_near(&key(1)).unwrap();
        r.close();
        r.close();
        assert_eq!(r.source().counters().closes, 1);
        assert_eq!(r.next().unwrap(), None);
    }

    #[test]
    fn close_failure_is_swallowed() {
        let src = MemorySortedSource::new(rows(&[1]), KeySpec::column(0, DataType::Int64))
            .unwrap()
            .failing_close();
        let mut r = RightSource::new(src, SourceLocator::new("mem://right"));
        r.open_near(&key(1)).unwrap();
        r.close();
        assert!(!r.is_open());
        assert!(!r.source().is_open());
    }

    #[test]
    fn reading_unopened_source_is_an_error() {
        let mut r = adapter(&[1]);
        assert!(matches!(r.next(), Err(OpError::Exec(_))));
    }
}
