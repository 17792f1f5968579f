//! Left inputs for the join driver.

use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sortmerge_core::prelude::{Row, Schema};
use sortmerge_io::readers::csv::CsvRowReader;
use sortmerge_operators::{LeftInput, LeftPoll, OpError};

/// Replays a fixed sequence of polls, then reports end of input forever.
#[derive(Debug, Clone, Default)]
pub struct VecLeftInput {
    polls: VecDeque<LeftPoll>,
}

impl VecLeftInput {
    pub fn from_polls(polls: Vec<LeftPoll>) -> Self {
        Self {
            polls: polls.into(),
        }
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::from_polls(rows.into_iter().map(LeftPoll::Row).collect())
    }

    /// Rows grouped into segments, with an end-of-segment marker between
    /// consecutive segments.
    pub fn from_segments(segments: Vec<Vec<Row>>) -> Self {
        let mut polls = Vec::new();
        let n = segments.len();
        for (i, seg) in segments.into_iter().enumerate() {
            polls.extend(seg.into_iter().map(LeftPoll::Row));
            if i + 1 < n {
                polls.push(LeftPoll::EndOfSegment);
            }
        }
        Self::from_polls(polls)
    }

    pub fn remaining(&self) -> usize {
        self.polls.len()
    }
}

impl LeftInput for VecLeftInput {
    fn next_left(&mut self) -> Result<LeftPoll, OpError> {
        Ok(self.polls.pop_front().unwrap_or(LeftPoll::EndOfInput))
    }
}

/// Left rows read from a headed CSV stream.
pub struct CsvLeftInput<R: Read> {
    reader: CsvRowReader<R>,
}

impl CsvLeftInput<File> {
    pub fn from_path(path: impl AsRef<Path>, schema: Schema) -> Result<Self, sortmerge_io::Error> {
        Ok(Self {
            reader: CsvRowReader::from_path(path, schema)?,
        })
    }
}

impl<R: Read> CsvLeftInput<R> {
    pub fn from_reader(reader: R, schema: Schema) -> Result<Self, sortmerge_io::Error> {
        Ok(Self {
            reader: CsvRowReader::from_reader(reader, schema)?,
        })
    }
}

impl<R: Read> LeftInput for CsvLeftInput<R> {
    fn next_left(&mut self) -> Result<LeftPoll, OpError> {
        match self.reader.next_row() {
            Ok(Some(row)) => Ok(LeftPoll::Row(row)),
            Ok(None) => Ok(LeftPoll::EndOfInput),
            Err(e) => Err(OpError::Exec(format!("left input: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortmerge_core::prelude::{DataType, Field, Scalar};

    #[test]
    fn segments_are_separated_and_input_ends() {
        let r = |k| Row::new(vec![Scalar::I64(k)]);
        let mut input = VecLeftInput::from_segments(vec![vec![r(1)], vec![], vec![r(2)]]);
        assert_eq!(input.next_left().unwrap(), LeftPoll::Row(r(1)));
        assert_eq!(input.next_left().unwrap(), LeftPoll::EndOfSegment);
        assert_eq!(input.next_left().unwrap(), LeftPoll::EndOfSegment);
        assert_eq!(input.next_left().unwrap(), LeftPoll::Row(r(2)));
        assert_eq!(input.next_left().unwrap(), LeftPoll::EndOfInput);
        assert_eq!(input.next_left().unwrap(), LeftPoll::EndOfInput);
    }

    #[test]
    fn csv_parse_errors_surface_as_exec_errors() {
        let schema = Schema::new(vec![Field::new("id", DataType::Int64, false)]);
        let mut input = CsvLeftInput::from_reader("id\n1\nx\n".as_bytes(), schema).unwrap();
        assert!(matches!(input.next_left().unwrap(), LeftPoll::Row(_)));
        assert!(matches!(input.next_left(), Err(OpError::Exec(_))));
    }
}
