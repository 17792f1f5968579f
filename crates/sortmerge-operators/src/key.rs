//! Row → join key projection for one side of the join.

use sortmerge_core::prelude::{JoinKey, KeySpec, Row, Schema};

use crate::traits::OpError;

#[derive(Debug, Clone)]
pub struct KeyExtractor {
    spec: KeySpec,
}

impl KeyExtractor {
    pub fn new(spec: KeySpec) -> Result<Self, OpError> {
        if spec.fields.is_empty() {
            return Err(OpError::KeyExtraction("key spec names no columns".into()));
        }
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &KeySpec {
        &self.spec
    }

    /// Key of `row`, or `None` when any key component is null.
    pub fn extract(&self, row: &Row) -> Result<Option<JoinKey>, OpError> {
        let key = self
            .spec
            .project(row)
            .map_err(|e| OpError::KeyExtraction(e.to_string()))?;
        Ok(key.is_joinable().then_some(key))
    }

    /// Check the key columns exist in `schema` with matching types.
    pub fn check_schema(&self, schema: &Schema) -> Result<(), OpError> {
        for kf in &self.spec.fields {
            let field = schema.field(kf.column).ok_or_else(|| {
                OpError::KeyExtraction(format!(
                    "key column {} out of range for schema of {} fields",
                    kf.column,
                    schema.len()
                ))
            })?;
            if field.data_type != kf.data_type {
                return Err(OpError::KeyExtraction(format!(
                    "key column '{}' is {:?}, key expects {:?}",
                    field.name, field.data_type, kf.data_type
                )));
            }
        }
        Ok(())
    }

    /// Names of the key columns in `schema`, in key order.
    pub fn column_names(&self, schema: &Schema) -> Vec<String> {
        self.spec
            .fields
            .iter()
            .filter_map(|kf| schema.field(kf.column).map(|f| f.name.clone()))
            .collect()
    }
}
