//! Join keys and the per-side key projection spec.
//!
//! A key is either one scalar or an ordered tuple of scalars. Keys are
//! totally ordered with [`compare_scalars`], so they can drive a merge.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{DataType, Schema};
use crate::types::{compare_scalar_tuples, compare_scalars, Row, Scalar};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JoinKey {
    Scalar(Scalar),
    Composite(Vec<Scalar>),
}

impl JoinKey {
    /// A key with a null anywhere in it can never join.
    pub fn is_joinable(&self) -> bool {
        match self {
            JoinKey::Scalar(s) => !s.is_null(),
            JoinKey::Composite(parts) => parts.iter().all(|s| !s.is_null()),
        }
    }

    pub fn parts(&self) -> &[Scalar] {
        match self {
            JoinKey::Scalar(s) => std::slice::from_ref(s),
            JoinKey::Composite(parts) => parts,
        }
    }
}

impl Ord for JoinKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (JoinKey::Scalar(a), JoinKey::Scalar(b)) => compare_scalars(a, b),
            _ => compare_scalar_tuples(self.parts(), other.parts()),
        }
    }
}

impl PartialOrd for JoinKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for JoinKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JoinKey {}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKey::Scalar(s) => write!(f, "{s}"),
            JoinKey::Composite(parts) => {
                write!(f, "(")?;
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// One component of a key projection: which column, and what type it must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyField {
    pub column: usize,
    pub data_type: DataType,
}

/// Ordered list of key components for one side of the join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    pub fields: Vec<KeyField>,
}

impl KeySpec {
    pub fn new(fields: Vec<KeyField>) -> Self {
        Self { fields }
    }

    /// Single-column key.
    pub fn column(column: usize, data_type: DataType) -> Self {
        Self {
            fields: vec![KeyField { column, data_type }],
        }
    }

    /// Resolve key column names against a schema.
    pub fn from_names(schema: &Schema, names: &[String]) -> crate::error::Result<Self> {
        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            let column = schema
                .index_of(name)
                .ok_or_else(|| crate::error::Error::Schema(format!("key column '{name}' not in schema")))?;
            fields.push(KeyField {
                column,
                data_type: schema.fields[column].data_type,
            });
        }
        Ok(Self { fields })
    }

    /// Project the key out of a row.
    ///
    /// Fails when a key column is missing or holds a value of the wrong type.
    /// Nulls are projected as-is; callers decide whether the key can join.
    pub fn project(&self, row: &Row) -> crate::error::Result<JoinKey> {
        let mut parts = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = row.get(field.column).ok_or_else(|| {
                crate::error::Error::Schema(format!(
                    "key column {} out of range for row of arity {}",
                    field.column,
                    row.arity()
                ))
            })?;
            if let Some(actual) = value.data_type() {
                if actual != field.data_type {
                    return Err(crate::error::Error::Schema(format!(
                        "key column {} holds {:?}, expected {:?}",
                        field.column, actual, field.data_type
                    )));
                }
            }
            parts.push(value.clone());
        }
        match parts.len() {
            0 => Err(crate::error::Error::Schema("empty key projection".into())),
            1 => Ok(JoinKey::Scalar(parts.remove(0))),
            _ => Ok(JoinKey::Composite(parts)),
        }
    }

    pub fn is_composite(&self) -> bool {
        self.fields.len() > 1
    }

    pub fn types(&self) -> Vec<DataType> {
        self.fields.iter().map(|f| f.data_type).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    #[test]
    fn composite_null_component_is_unjoinable() {
        let k = JoinKey::Composite(vec![Scalar::I64(1), Scalar::Null]);
        assert!(!k.is_joinable());
        assert!(JoinKey::Scalar(Scalar::I64(1)).is_joinable());
        assert!(!JoinKey::Scalar(Scalar::Null).is_joinable());
    }

    #[test]
    fn keys_order_lexicographically() {
        let a = JoinKey::Composite(vec![Scalar::I64(1), Scalar::Str("b".into())]);
        let b = JoinKey::Composite(vec![Scalar::I64(2), Scalar::Str("a".into())]);
        assert!(a < b);
        assert_eq!(JoinKey::Scalar(Scalar::F64(0.0)), JoinKey::Scalar(Scalar::F64(-0.0)));
    }

    #[test]
    fn spec_from_names_resolves_types() {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("id", DataType::Int64, false),
        ]);
        let spec = KeySpec::from_names(&schema, &["id".to_string()]).unwrap();
        assert_eq!(spec, KeySpec::column(1, DataType::Int64));
        assert!(KeySpec::from_names(&schema, &["missing".to_string()]).is_err());
    }

    #[test]
    fn project_builds_scalar_and_composite_keys() {
        let row = Row::new(vec![Scalar::Str("a".into()), Scalar::I64(7), Scalar::Null]);
        let single = KeySpec::column(1, DataType::Int64);
        assert_eq!(single.project(&row).unwrap(), JoinKey::Scalar(Scalar::I64(7)));

        let composite = KeySpec::new(vec![
            KeyField { column: 1, data_type: DataType::Int64 },
            KeyField { column: 0, data_type: DataType::Utf8 },
        ]);
        assert_eq!(
            composite.project(&row).unwrap(),
            JoinKey::Composite(vec![Scalar::I64(7), Scalar::Str("a".into())])
        );

        // Nulls project without a type check.
        let nullable = KeySpec::column(2, DataType::Int64);
        assert!(!nullable.project(&row).unwrap().is_joinable());
    }

    #[test]
    fn project_rejects_wrong_type_and_missing_column() {
        let row = Row::new(vec![Scalar::Str("a".into())]);
        assert!(KeySpec::column(0, DataType::Int64).project(&row).is_err());
        assert!(KeySpec::column(3, DataType::Utf8).project(&row).is_err());
        assert!(KeySpec::default().project(&row).is_err());
    }
}
