//! Typed CSV row reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sortmerge_core::schema::{DataType, Schema};
use sortmerge_core::types::{Row, Scalar};

use crate::error::{Error, Result};

/// Decode one CSV record into a row using `schema`.
///
/// An empty field is `Null`, except in a non-nullable `Utf8` column where it
/// is the empty string. `record_no` is only used in error messages.
pub fn parse_record(record: &csv::StringRecord, schema: &Schema, record_no: u64) -> Result<Row> {
    if record.len() != schema.len() {
        return Err(Error::Parse {
            record: record_no,
            message: format!("expected {} fields, found {}", schema.len(), record.len()),
        });
    }

    let mut values = Vec::with_capacity(schema.len());
    for (raw, field) in record.iter().zip(schema.fields.iter()) {
        if raw.is_empty() {
            if field.data_type == DataType::Utf8 && !field.nullable {
                values.push(Scalar::Str(String::new()));
            } else {
                values.push(Scalar::Null);
            }
            continue;
        }
        let bad = |e: &dyn std::fmt::Display| Error::Parse {
            record: record_no,
            message: format!("column '{}': {e}", field.name),
        };
        let v = match field.data_type {
            DataType::Boolean => Scalar::Bool(raw.parse::<bool>().map_err(|e| bad(&e))?),
            DataType::Int32 => Scalar::I32(raw.parse::<i32>().map_err(|e| bad(&e))?),
            DataType::Int64 => Scalar::I64(raw.parse::<i64>().map_err(|e| bad(&e))?),
            DataType::Float32 => Scalar::F32(raw.parse::<f32>().map_err(|e| bad(&e))?),
            DataType::Float64 => Scalar::F64(raw.parse::<f64>().map_err(|e| bad(&e))?),
            DataType::Utf8 => Scalar::Str(raw.to_string()),
            DataType::Binary => Scalar::Bin(raw.as_bytes().to_vec()),
        };
        values.push(v);
    }
    Ok(Row::new(values))
}

/// Sequential reader of typed rows from a headed CSV stream.
pub struct CsvRowReader<R: Read> {
    rdr: csv::Reader<R>,
    schema: Schema,
    record: csv::StringRecord,
    records_read: u64,
}

impl CsvRowReader<File> {
    pub fn from_path(path: impl AsRef<Path>, schema: Schema) -> Result<Self> {
        let f = File::open(path)?;
        Self::from_reader(f, schema)
    }
}

impl<R: Read> CsvRowReader<R> {
    /// Wrap a reader. The first line must be a header whose width matches
    /// the schema.
    pub fn from_reader(reader: R, schema: Schema) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let width = rdr.headers()?.len();
        if width != schema.len() {
            return Err(Error::Parse {
                record: 0,
                message: format!("header has {width} columns, schema has {}", schema.len()),
            });
        }
        Ok(Self {
            rdr,
            schema,
            record: csv::StringRecord::new(),
            records_read: 0,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Next row, or `None` at end of input.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if !self.rdr.read_record(&mut self.record)? {
            return Ok(None);
        }
        self.records_read += 1;
        parse_record(&self.record, &self.schema, self.records_read).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortmerge_core::schema::Field;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Int64, true),
            Field::new("name", DataType::Utf8, false),
            Field::new("score", DataType::Float64, true),
        ])
    }

    #[test]
    fn reads_typed_rows_and_nulls() {
        let data = "id,name,score\n1,a,0.5\n,,\n";
        let mut r = CsvRowReader::from_reader(data.as_bytes(), schema()).unwrap();
        assert_eq!(
            r.next_row().unwrap().unwrap(),
            Row::new(vec![Scalar::I64(1), Scalar::Str("a".into()), Scalar::F64(0.5)])
        );
        assert_eq!(
            r.next_row().unwrap().unwrap(),
            Row::new(vec![Scalar::Null, Scalar::Str(String::new()), Scalar::Null])
        );
        assert!(r.next_row().unwrap().is_none());
        assert_eq!(r.records_read(), 2);
    }

    #[test]
    fn bad_number_reports_record() {
        let data = "id,name,score\n1,a,0.5\nx,b,1\n";
        let mut r = CsvRowReader::from_reader(data.as_bytes(), schema()).unwrap();
        r.next_row().unwrap();
        match r.next_row() {
            Err(Error::Parse { record, .. }) => assert_eq!(record, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn header_width_must_match_schema() {
        let data = "id,name\n1,a\n";
        assert!(CsvRowReader::from_reader(data.as_bytes(), schema()).is_err());
    }
}
