//! Left run buffer: every buffered row shares one join key.

use sortmerge_core::prelude::Row;

#[derive(Debug, Clone, Default)]
pub struct LeftBuffer {
    rows: Vec<Row>,
}

impl LeftBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn get(&self, idx: usize) -> Option<&Row> {
        self.rows.get(idx)
    }

    /// `idx` counted back from the newest row (0 is the newest).
    pub fn get_from_end(&self, idx: usize) -> Option<&Row> {
        self.rows.len().checked_sub(idx + 1).and_then(|i| self.rows.get(i))
    }

    pub fn last(&self) -> Option<&Row> {
        self.rows.last()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop every row but keep the allocation.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Replace the contents with a single row.
    pub fn reset_with(&mut self, row: Row) {
        self.rows.clear();
        self.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortmerge_core::prelude::Scalar;

    fn r(v: i64) -> Row {
        Row::new(vec![Scalar::I64(v)])
    }

    #[test]
    fn indexed_access_from_both_ends() {
        let mut b = LeftBuffer::with_capacity(4);
        b.push(r(1));
        b.push(r(2));
        b.push(r(3));
        assert_eq!(b.get(0), Some(&r(1)));
        assert_eq!(b.get_from_end(0), Some(&r(3)));
        assert_eq!(b.get_from_end(2), Some(&r(1)));
        assert_eq!(b.get_from_end(3), None);
    }

    #[test]
    fn reset_keeps_only_new_row() {
        let mut b = LeftBuffer::default();
        b.push(r(1));
        b.push(r(1));
        b.reset_with(r(2));
        assert_eq!(b.len(), 1);
        assert_eq!(b.last(), Some(&r(2)));
        b.clear();
        assert!(b.is_empty());
    }
}
