//! Operator trait + common interfaces.
//!
//! Callers use `plan(...)` to obtain an `OpPlan` (output schema, footprint)
//! before driving an operator. Row-at-a-time evaluation lives on the
//! concrete types: `RowTransform::apply` for transforms and
//! `MergeJoin::produce_next` for the join.

use std::fmt;

use sortmerge_core::prelude::{Row, Schema};
use thiserror::Error;

use crate::plan::{Footprint, OpPlan};

/// Which join input a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Error)]
pub enum OpError {
    #[error(
        "{side} input is not sorted: row {current} follows row {previous}; \
         both join inputs must be sorted ascending on the join key"
    )]
    SortOrder {
        side: Side,
        previous: Row,
        current: Row,
    },

    #[error("key extraction error: {0}")]
    KeyExtraction(String),

    #[error("right source error: {0}")]
    RightSource(#[from] sortmerge_io::Error),

    #[error("planning error: {0}")]
    Plan(String),

    #[error("execution error: {0}")]
    Exec(String),

    #[error("schema error: {0}")]
    Schema(String),
}

/// Planning surface shared by every operator.
pub trait Operator {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Rough memory model per row flowing through the operator.
    fn memory_need(&self, rows: u64, bytes: u64) -> Footprint;

    /// Given input schemas, return the output schema and footprint.
    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError>;
}
