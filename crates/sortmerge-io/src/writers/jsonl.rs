//! Streaming NDJSON writer.

use std::fs::File;
use std::io::{BufWriter, Write};

use serde_json::{Map, Value};
use sortmerge_core::types::{Row, Scalar};

use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    // Output columns in order; joined rows may repeat a name, so keys are
    // suffixed on collision rather than overwritten.
    columns: Vec<String>,
}

impl JsonlWriter<File> {
    pub fn to_path(path: &str, columns: Vec<String>) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f, columns))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W, columns: Vec<String>) -> Self {
        Self {
            writer: BufWriter::new(writer),
            columns: dedupe_names(columns),
        }
    }

    /// Write one row as a JSON object. Without column names the row is
    /// written as a JSON array.
    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        let line = if self.columns.is_empty() {
            Value::Array(row.values.iter().map(scalar_to_json).collect())
        } else {
            let mut obj = Map::with_capacity(self.columns.len());
            for (name, val) in self.columns.iter().zip(row.values.iter()) {
                obj.insert(name.clone(), scalar_to_json(val));
            }
            Value::Object(obj)
        };
        serde_json::to_writer(&mut self.writer, &line)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn dedupe_names(columns: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(columns.len());
    for name in columns {
        let mut candidate = name.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{name}_{n}");
            n += 1;
        }
        out.push(candidate);
    }
    out
}

fn scalar_to_json(v: &Scalar) -> Value {
    use Scalar::*;
    match v {
        Null => Value::Null,
        Bool(b) => Value::Bool(*b),
        I32(i) => Value::from(*i),
        I64(i) => Value::from(*i),
        F32(f) => Value::from(*f as f64),
        F64(f) => Value::from(*f),
        Str(s) => Value::String(s.clone()),
        Bin(b) => Value::String(format!("[binary {} bytes]", b.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_get_suffixes() {
        let mut buf = Vec::new();
        {
            let mut w = JsonlWriter::to_writer(&mut buf, vec!["id".into(), "id".into()]);
            w.write_row(&Row::new(vec![Scalar::I64(1), Scalar::I64(1)])).unwrap();
            w.flush().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let v: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(v["id"], 1);
        assert_eq!(v["id_1"], 1);
    }

    #[test]
    fn without_columns_rows_are_arrays() {
        let mut buf = Vec::new();
        {
            let mut w = JsonlWriter::to_writer(&mut buf, Vec::new());
            w.write_row(&Row::new(vec![Scalar::Null, Scalar::Str("x".into())]))
                .unwrap();
            w.flush().unwrap();
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "[null,\"x\"]\n");
    }
}
