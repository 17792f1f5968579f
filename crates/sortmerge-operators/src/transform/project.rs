//! Column projection by name.

use sortmerge_core::prelude::{Row, Schema};

use super::RowTransform;
use crate::plan::{Footprint, OpPlan};
use crate::traits::{OpError, Operator};

#[derive(Debug, Clone)]
pub struct Project {
    pub names: Vec<String>,
    columns: Vec<usize>,
}

impl Project {
    /// Resolve `names` against `schema`. Output keeps the given order.
    pub fn new(names: &[String], schema: &Schema) -> Result<Self, OpError> {
        if names.is_empty() {
            return Err(OpError::Plan("projection names no columns".into()));
        }
        let columns = names
            .iter()
            .map(|n| {
                schema
                    .index_of(n)
                    .ok_or_else(|| OpError::Schema(format!("project: column '{n}' not found")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            names: names.to_vec(),
            columns,
        })
    }
}

impl RowTransform for Project {
    fn apply(&self, row: Row) -> Result<Option<Row>, OpError> {
        let mut values = Vec::with_capacity(self.columns.len());
        for &i in &self.columns {
            let v = row
                .get(i)
                .ok_or_else(|| OpError::Exec(format!("project: column {i} out of range")))?;
            values.push(v.clone());
        }
        Ok(Some(Row::new(values)))
    }

    fn output_schema(&self, input: &Schema) -> Result<Schema, OpError> {
        input
            .project(&self.names)
            .ok_or_else(|| OpError::Schema(format!("project: {:?} not all in input", self.names)))
    }
}

impl Operator for Project {
    fn name(&self) -> &'static str {
        "project"
    }

    fn memory_need(&self, _rows: u64, _bytes: u64) -> Footprint {
        Footprint {
            bytes_per_row: 0,
            overhead_bytes: 0,
        }
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let schema = input_schemas
            .first()
            .ok_or_else(|| OpError::Plan("project expects one input".into()))?;
        Ok(OpPlan::new(self.output_schema(schema)?, self.memory_need(0, 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortmerge_core::prelude::{DataType, Field, Scalar};

    #[test]
    fn reorders_and_plans() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int64, false),
            Field::new("b", DataType::Utf8, true),
        ]);
        let p = Project::new(&["b".to_string(), "a".to_string()], &schema).unwrap();
        let out = p
            .apply(Row::new(vec![Scalar::I64(1), Scalar::Str("x".into())]))
            .unwrap()
            .unwrap();
        assert_eq!(out, Row::new(vec![Scalar::Str("x".into()), Scalar::I64(1)]));
        let plan = p.plan(&[schema.clone()]).unwrap();
        assert_eq!(plan.output_schema.fields[0].name, "b");
        assert!(Project::new(&["z".to_string()], &schema).is_err());
    }
}
