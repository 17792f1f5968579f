//! Logical schema types. Pure data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    Binary,
}

impl DataType {
    /// Parse a type tag as written in job files. Unknown tags map to `Utf8`.
    pub fn parse(s: &str) -> DataType {
        match s {
            "Boolean" | "bool" => DataType::Boolean,
            "Int32" | "i32" => DataType::Int32,
            "Int64" | "i64" => DataType::Int64,
            "Float32" | "f32" => DataType::Float32,
            "Float64" | "f64" => DataType::Float64,
            "Binary" | "bytes" => DataType::Binary,
            _ => DataType::Utf8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Schema of a joined row: every left field followed by every right
    /// field, names and types untouched.
    pub fn join(left: &Schema, right: &Schema) -> Schema {
        let mut fields = Vec::with_capacity(left.len() + right.len());
        fields.extend(left.fields.iter().cloned());
        fields.extend(right.fields.iter().cloned());
        Schema { fields }
    }

    /// Keep only the named columns, in the given order.
    pub fn project(&self, columns: &[String]) -> Option<Schema> {
        let fields = columns
            .iter()
            .map(|c| self.index_of(c).map(|i| self.fields[i].clone()))
            .collect::<Option<Vec<_>>>()?;
        Some(Schema { fields })
    }
}
