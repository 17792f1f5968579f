//! Destinations for joined rows.

use std::io::Write;

use sortmerge_core::prelude::Row;
use sortmerge_io::writers::csv::CsvRowWriter;
use sortmerge_io::writers::jsonl::JsonlWriter;

use crate::runtime::ExecError;

pub trait RowSink {
    fn write_row(&mut self, row: &Row) -> Result<(), ExecError>;

    /// Called once after the last row.
    fn finish(&mut self) -> Result<(), ExecError> {
        Ok(())
    }
}

impl RowSink for Vec<Row> {
    fn write_row(&mut self, row: &Row) -> Result<(), ExecError> {
        self.push(row.clone());
        Ok(())
    }
}

impl<W: Write> RowSink for CsvRowWriter<W> {
    fn write_row(&mut self, row: &Row) -> Result<(), ExecError> {
        Ok(CsvRowWriter::write_row(self, row)?)
    }

    fn finish(&mut self) -> Result<(), ExecError> {
        Ok(self.flush()?)
    }
}

impl<W: Write> RowSink for JsonlWriter<W> {
    fn write_row(&mut self, row: &Row) -> Result<(), ExecError> {
        Ok(JsonlWriter::write_row(self, row)?)
    }

    fn finish(&mut self) -> Result<(), ExecError> {
        Ok(self.flush()?)
    }
}

impl<T: RowSink + ?Sized> RowSink for Box<T> {
    fn write_row(&mut self, row: &Row) -> Result<(), ExecError> {
        (**self).write_row(row)
    }

    fn finish(&mut self) -> Result<(), ExecError> {
        (**self).finish()
    }
}
