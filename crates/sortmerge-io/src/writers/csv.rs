//! Streaming CSV writer.

use std::fs::File;
use std::io::Write;

use sortmerge_core::schema::Schema;
use sortmerge_core::types::{Row, Scalar};

use crate::error::Result;

pub struct CsvRowWriter<W: Write> {
    wtr: csv::Writer<W>,
}

impl CsvRowWriter<File> {
    pub fn to_path(path: &str, schema: Option<&Schema>) -> Result<Self> {
        let f = File::create(path)?;
        Self::to_writer(f, schema)
    }
}

impl<W: Write> CsvRowWriter<W> {
    /// Writes a header line first when a schema is given.
    pub fn to_writer(writer: W, schema: Option<&Schema>) -> Result<Self> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        if let Some(schema) = schema {
            wtr.write_record(schema.fields.iter().map(|f| f.name.as_str()))?;
        }
        Ok(Self { wtr })
    }

    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        self.wtr.write_record(row.values.iter().map(scalar_to_field))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.wtr.flush()?;
        Ok(())
    }
}

/// Nulls become empty fields so the output reads back through `parse_record`.
fn scalar_to_field(v: &Scalar) -> String {
    match v {
        Scalar::Null => String::new(),
        Scalar::Bin(b) => String::from_utf8_lossy(b).into_owned(),
        other => other.to_string(),
    }
}
