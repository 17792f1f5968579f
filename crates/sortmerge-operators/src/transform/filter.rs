//! Filter transform with simple predicate evaluation.
//!
//! Supports expressions of the form: "col OP literal" where OP ∈ {==, !=, <, <=, >, >=}.
//! The literal is parsed once, against the column's type, when the filter is built.

use std::cmp::Ordering;

use sortmerge_core::prelude::{DataType, Row, Scalar, Schema};
use sortmerge_core::types::compare_scalars;

use super::RowTransform;
use crate::plan::{Footprint, OpPlan};
use crate::traits::{OpError, Operator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Filter {
    pub column: usize,
    pub op: CmpOp,
    pub literal: Scalar,
}

impl Filter {
    /// Parse a predicate like "age > 18" or "name == Alice" against `schema`.
    pub fn parse(expr: &str, schema: &Schema) -> Result<Self, OpError> {
        let (col_name, op, literal) = parse_simple_predicate(expr)?;
        let column = schema
            .index_of(&col_name)
            .ok_or_else(|| OpError::Plan(format!("column '{}' not found", col_name)))?;
        let data_type = schema.fields[column].data_type;
        let literal = parse_literal(&literal, data_type)?;
        if matches!(literal, Scalar::Bool(_)) && !matches!(op, CmpOp::Eq | CmpOp::Ne) {
            return Err(OpError::Plan(format!("unsupported op {:?} for bool", op)));
        }
        Ok(Self {
            column,
            op,
            literal,
        })
    }
}

impl RowTransform for Filter {
    fn apply(&self, row: Row) -> Result<Option<Row>, OpError> {
        let val = row
            .get(self.column)
            .ok_or_else(|| OpError::Exec(format!("filter column {} out of range", self.column)))?;
        // Null comparisons are false
        if val.is_null() {
            return Ok(None);
        }
        if val.data_type() != self.literal.data_type() {
            return Err(OpError::Exec(format!(
                "filter column {} holds {:?}, predicate expects {:?}",
                self.column,
                val.data_type(),
                self.literal.data_type()
            )));
        }
        let keep = self.op.holds(compare_scalars(val, &self.literal));
        Ok(keep.then_some(row))
    }

    fn output_schema(&self, input: &Schema) -> Result<Schema, OpError> {
        Ok(input.clone())
    }
}

impl Operator for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn memory_need(&self, _rows: u64, _bytes: u64) -> Footprint {
        // Filtering is streaming; nothing is buffered.
        Footprint {
            bytes_per_row: 0,
            overhead_bytes: 0,
        }
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let schema = input_schemas
            .first()
            .ok_or_else(|| OpError::Plan("filter expects one input".into()))?;
        Ok(OpPlan::new(self.output_schema(schema)?, self.memory_need(0, 0)))
    }
}

fn parse_simple_predicate(expr: &str) -> Result<(String, CmpOp, String), OpError> {
    let ops = [
        ("==", CmpOp::Eq),
        ("!=", CmpOp::Ne),
        ("<=", CmpOp::Le),
        (">=", CmpOp::Ge),
        ("<", CmpOp::Lt),
        (">", CmpOp::Gt),
    ];

    for (tok, op) in ops {
        if let Some(pos) = expr.find(tok) {
            let col = expr[..pos].trim().to_string();
            let lit = expr[pos + tok.len()..].trim().to_string();
            if col.is_empty() {
                break;
            }
            return Ok((col, op, lit));
        }
    }

    Err(OpError::Plan(format!("unparseable predicate: {}", expr)))
}

fn parse_literal(literal: &str, data_type: DataType) -> Result<Scalar, OpError> {
    let bad = || OpError::Plan(format!("cannot parse '{}' as {:?}", literal, data_type));
    Ok(match data_type {
        DataType::Boolean => Scalar::Bool(literal.parse().map_err(|_| bad())?),
        DataType::Int32 => Scalar::I32(literal.parse().map_err(|_| bad())?),
        DataType::Int64 => Scalar::I64(literal.parse().map_err(|_| bad())?),
        DataType::Float32 => Scalar::F32(literal.parse().map_err(|_| bad())?),
        DataType::Float64 => Scalar::F64(literal.parse().map_err(|_| bad())?),
        DataType::Utf8 => Scalar::Str(literal.to_string()),
        DataType::Binary => return Err(OpError::Plan("cannot filter on binary data".into())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortmerge_core::prelude::Field;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("age", DataType::Int32, true),
            Field::new("name", DataType::Utf8, true),
            Field::new("active", DataType::Boolean, true),
        ])
    }

    fn row(age: Scalar, name: &str) -> Row {
        Row::new(vec![age, Scalar::Str(name.into()), Scalar::Bool(true)])
    }

    #[test]
    fn numeric_comparisons() {
        let f = Filter::parse("age > 18", &schema()).unwrap();
        assert!(f.apply(row(Scalar::I32(30), "a")).unwrap().is_some());
        assert!(f.apply(row(Scalar::I32(18), "b")).unwrap().is_none());
        let f = Filter::parse("age <= 18", &schema()).unwrap();
        assert!(f.apply(row(Scalar::I32(18), "b")).unwrap().is_some());
    }

    #[test]
    fn nulls_never_pass() {
        let f = Filter::parse("age != 5", &schema()).unwrap();
        assert!(f.apply(row(Scalar::Null, "a")).unwrap().is_none());
    }

    #[test]
    fn string_equality() {
        let f = Filter::parse("name == Alice", &schema()).unwrap();
        assert!(f.apply(row(Scalar::I32(1), "Alice")).unwrap().is_some());
        assert!(f.apply(row(Scalar::I32(1), "Bob")).unwrap().is_none());
    }

    #[test]
    fn bad_predicates_fail_at_build_time() {
        assert!(Filter::parse("age ~ 3", &schema()).is_err());
        assert!(Filter::parse("missing == 3", &schema()).is_err());
        assert!(Filter::parse("age == old", &schema()).is_err());
        assert!(Filter::parse("active < true", &schema()).is_err());
        assert!(Filter::parse("active == true", &schema()).is_ok());
    }
}
