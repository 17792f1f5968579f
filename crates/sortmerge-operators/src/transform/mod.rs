//! Row-level transforms applied to right-side rows before they reach the
//! join.
//!
//! A transform consumes a row and either returns a row or drops it. A
//! `TransformPipeline` chains transforms; the output of one stage is the
//! input of the next and the first stage to drop a row ends its trip.

pub mod filter;
pub mod project;

use sortmerge_core::prelude::{Row, Schema};

use crate::traits::OpError;

pub use filter::Filter;
pub use project::Project;

pub trait RowTransform {
    /// `Ok(None)` drops the row.
    fn apply(&self, row: Row) -> Result<Option<Row>, OpError>;

    /// Schema of rows this transform emits for input rows of `input`.
    fn output_schema(&self, input: &Schema) -> Result<Schema, OpError>;
}

pub struct TransformPipeline {
    stages: Vec<Box<dyn RowTransform>>,
}

impl TransformPipeline {
    /// A pipeline needs at least one stage.
    pub fn new(stages: Vec<Box<dyn RowTransform>>) -> Result<Self, OpError> {
        if stages.is_empty() {
            return Err(OpError::Plan(
                "transform pipeline must have exactly one root and one leaf".into(),
            ));
        }
        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn apply(&self, row: Row) -> Result<Option<Row>, OpError> {
        let mut current = row;
        for stage in &self.stages {
            match stage.apply(current)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    pub fn output_schema(&self, input: &Schema) -> Result<Schema, OpError> {
        let mut schema = input.clone();
        for stage in &self.stages {
            schema = stage.output_schema(&schema)?;
        }
        Ok(schema)
    }
}

impl std::fmt::Debug for TransformPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformPipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}
