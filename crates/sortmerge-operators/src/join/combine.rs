//! Joined row construction.

use sortmerge_core::prelude::{Row, Schema};
use tracing::debug;

/// Concatenates a left and a right row into a fresh output row.
#[derive(Debug, Clone, Default)]
pub struct RowCombiner {
    width: Option<usize>,
}

impl RowCombiner {
    /// With an output schema the combiner allocates rows of that width up
    /// front; without one it sizes from the input rows.
    pub fn new(output_schema: Option<&Schema>) -> Self {
        match output_schema {
            Some(schema) => {
                debug!(width = schema.len(), "row combiner using output schema");
                Self {
                    width: Some(schema.len()),
                }
            }
            None => {
                debug!("row combiner sizing rows from inputs");
                Self { width: None }
            }
        }
    }

    pub fn combine(&self, left: &Row, right: &Row) -> Row {
        let width = self
            .width
            .unwrap_or(0)
            .max(left.arity() + right.arity());
        let mut values = Vec::with_capacity(width);
        values.extend(left.values.iter().cloned());
        values.extend(right.values.iter().cloned());
        Row::new(values)
    }
}
