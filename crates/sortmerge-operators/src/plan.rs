//! Operator planning surfaces: `Footprint` and `OpPlan`.

use serde::{Deserialize, Serialize};
use sortmerge_core::prelude::Schema;

/// Coarse memory model for rows flowing through an operator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Footprint {
    /// Estimated bytes held per buffered row.
    pub bytes_per_row: u64,
    /// Fixed overhead independent of row count (buffers, read-ahead).
    pub overhead_bytes: u64,
}

impl Footprint {
    /// Estimate total live bytes when `rows` rows are buffered.
    pub fn estimate_live(&self, rows: u64, _bytes: u64) -> u64 {
        self.overhead_bytes + self.bytes_per_row.saturating_mul(rows)
    }
}

/// Operator plan: output schema, sort columns, and a cached footprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpPlan {
    pub output_schema: Schema,

    /// Columns (by name) the output stays sorted on.
    pub sorted_on: Vec<String>,

    pub footprint: Footprint,
}

impl OpPlan {
    pub fn new(output_schema: Schema, footprint: Footprint) -> Self {
        Self {
            output_schema,
            sorted_on: vec![],
            footprint,
        }
    }

    pub fn with_sorted_on(mut self, cols: Vec<String>) -> Self {
        self.sorted_on = cols;
        self
    }
}
