//! Expressions evaluated against tuples (row-wise) or chunks (batch).
//!
//! `get_value` is the reference evaluator and handles every node and type.
//! `get_column` is the vectorized path; it covers INTS and FLOATS columns only
//! and answers `Unimplemented` for anything else, in which case the caller
//! falls back to the row evaluator. Both must agree where both apply.

mod aggregate;
mod arithmetic;
mod comparison;
mod field;
pub(crate) mod kernel;
mod subquery;
mod vector;

pub use aggregate::{create_aggregator, AggregateExpr, AggregateType, Aggregator};
pub use arithmetic::{ArithmeticExpr, ArithmeticType};
pub use comparison::{CompOp, ComparisonExpr, ConjunctionExpr, ConjunctionType, IsNullExpr, LikeExpr};
pub use field::{CastExpr, FieldExpr, ValueExpr};
pub use subquery::SubqueryExpr;
pub use vector::VectorDistanceExpr;

use crate::chunk::{Chunk, Column};
use crate::tuple::Tuple;
use shoal_core::{AttrType, Error, Result, Value};
use shoal_storage::Trx;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExprType {
    Field,
    Value,
    Cast,
    Comparison,
    Conjunction,
    Arithmetic,
    Aggregation,
    Like,
    VectorDistance,
    IsNull,
    Subquery,
}

/// A bound expression tree.
#[derive(Debug)]
pub enum Expression {
    Field(FieldExpr),
    Value(ValueExpr),
    Cast(CastExpr),
    Comparison(ComparisonExpr),
    Conjunction(ConjunctionExpr),
    Arithmetic(ArithmeticExpr),
    Aggregate(AggregateExpr),
    Like(LikeExpr),
    VectorDistance(VectorDistanceExpr),
    IsNull(IsNullExpr),
    Subquery(SubqueryExpr),
}

impl Expression {
    /// A literal.
    pub fn value(value: impl Into<Value>) -> Self {
        Expression::Value(ValueExpr::new(value.into()))
    }

    /// A reference to `table.field`.
    pub fn field(table: impl Into<String>, field: impl Into<String>, attr_type: AttrType) -> Self {
        Expression::Field(FieldExpr::new(table, field, attr_type))
    }

    pub fn expr_type(&self) -> ExprType {
        match self {
            Expression::Field(_) => ExprType::Field,
            Expression::Value(_) => ExprType::Value,
            Expression::Cast(_) => ExprType::Cast,
            Expression::Comparison(_) => ExprType::Comparison,
            Expression::Conjunction(_) => ExprType::Conjunction,
            Expression::Arithmetic(_) => ExprType::Arithmetic,
            Expression::Aggregate(_) => ExprType::Aggregation,
            Expression::Like(_) => ExprType::Like,
            Expression::VectorDistance(_) => ExprType::VectorDistance,
            Expression::IsNull(_) => ExprType::IsNull,
            Expression::Subquery(_) => ExprType::Subquery,
        }
    }

    /// Type of the values this expression produces.
    pub fn value_type(&self) -> AttrType {
        match self {
            Expression::Field(e) => e.value_type(),
            Expression::Value(e) => e.value().attr_type(),
            Expression::Cast(e) => e.cast_type(),
            Expression::Comparison(_) | Expression::Conjunction(_) | Expression::Like(_) | Expression::IsNull(_) => {
                AttrType::Booleans
            }
            Expression::Arithmetic(e) => e.value_type(),
            Expression::Aggregate(e) => e.value_type(),
            Expression::VectorDistance(_) => AttrType::Floats,
            Expression::Subquery(_) => AttrType::Undefined,
        }
    }

    /// Rendered text of the expression; also the alias of a projected cell.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// The literal, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Expression::Value(e) => Some(e.value()),
            _ => None,
        }
    }

    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        match self {
            Expression::Field(e) => e.get_value(tuple),
            Expression::Value(e) => Ok(e.value().clone()),
            Expression::Cast(e) => e.get_value(tuple),
            Expression::Comparison(e) => e.get_value(tuple),
            Expression::Conjunction(e) => e.get_value(tuple),
            Expression::Arithmetic(e) => e.get_value(tuple),
            Expression::Aggregate(e) => e.get_value(tuple),
            Expression::Like(e) => e.get_value(tuple),
            Expression::VectorDistance(e) => e.get_value(tuple),
            Expression::IsNull(e) => e.get_value(tuple),
            Expression::Subquery(e) => e.get_value(),
        }
    }

    /// Evaluates without a tuple. Only trees of literals fold.
    pub fn try_get_value(&self) -> Result<Value> {
        match self {
            Expression::Value(e) => Ok(e.value().clone()),
            Expression::Cast(e) => e.try_get_value(),
            Expression::Arithmetic(e) => e.try_get_value(),
            Expression::Comparison(e) => e.try_get_value(),
            Expression::Field(e) => Err(Error::invalid_argument(format!("field {e} is not constant"))),
            other => Err(Error::unimplemented(format!(
                "constant folding of {:?} expression",
                other.expr_type()
            ))),
        }
    }

    pub fn get_column(&self, chunk: &Chunk) -> Result<Column> {
        match self {
            Expression::Field(e) => e.get_column(chunk),
            Expression::Value(e) => Ok(e.get_column()),
            Expression::Cast(e) => e.get_column(chunk),
            Expression::Comparison(e) => e.get_column(chunk),
            Expression::Conjunction(e) => e.get_column(chunk),
            Expression::Arithmetic(e) => e.get_column(chunk),
            Expression::Aggregate(e) => e.get_column(chunk),
            other => Err(Error::unimplemented(format!(
                "vectorized {:?} expression",
                other.expr_type()
            ))),
        }
    }

    /// Structural equality.
    pub fn equal(&self, other: &Expression) -> bool {
        match (self, other) {
            (Expression::Field(a), Expression::Field(b)) => a.equal(b),
            (Expression::Value(a), Expression::Value(b)) => a.equal(b),
            (Expression::Cast(a), Expression::Cast(b)) => {
                a.cast_type() == b.cast_type() && a.child().equal(b.child())
            }
            (Expression::Comparison(a), Expression::Comparison(b)) => {
                a.comp() == b.comp() && a.left().equal(b.left()) && a.right().equal(b.right())
            }
            (Expression::Conjunction(a), Expression::Conjunction(b)) => {
                a.conjunction_type() == b.conjunction_type()
                    && a.children().len() == b.children().len()
                    && a.children().iter().zip(b.children()).all(|(x, y)| x.equal(y))
            }
            (Expression::Arithmetic(a), Expression::Arithmetic(b)) => a.equal(b),
            (Expression::Aggregate(a), Expression::Aggregate(b)) => {
                a.aggregate_type() == b.aggregate_type() && a.child().equal(b.child())
            }
            (Expression::VectorDistance(a), Expression::VectorDistance(b)) => a.equal(b),
            (Expression::IsNull(a), Expression::IsNull(b)) => {
                a.is_negated() == b.is_negated() && a.child().equal(b.child())
            }
            (Expression::Subquery(a), Expression::Subquery(b)) => std::ptr::eq(a, b),
            (Expression::Like(a), Expression::Like(b)) => {
                a.is_negated() == b.is_negated() && a.value().equal(b.value()) && a.pattern().equal(b.pattern())
            }
            _ => false,
        }
    }

    /// Binds `trx` to every subquery in the tree.
    pub fn prepare(&self, trx: &Trx) {
        match self {
            Expression::Subquery(e) => e.prepare(trx),
            Expression::Cast(e) => e.child().prepare(trx),
            Expression::Comparison(e) => {
                e.left().prepare(trx);
                e.right().prepare(trx);
            }
            Expression::Conjunction(e) => e.children().iter().for_each(|c| c.prepare(trx)),
            Expression::Arithmetic(e) => {
                e.left().prepare(trx);
                if let Some(right) = e.right() {
                    right.prepare(trx);
                }
            }
            Expression::Aggregate(e) => e.child().prepare(trx),
            Expression::VectorDistance(e) => {
                e.left().prepare(trx);
                e.right().prepare(trx);
            }
            Expression::IsNull(e) => e.child().prepare(trx),
            Expression::Like(e) => {
                e.value().prepare(trx);
                e.pattern().prepare(trx);
            }
            Expression::Field(_) | Expression::Value(_) => {}
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Field(e) => fmt::Display::fmt(e, f),
            Expression::Value(e) => fmt::Display::fmt(e, f),
            Expression::Cast(e) => fmt::Display::fmt(e, f),
            Expression::Comparison(e) => fmt::Display::fmt(e, f),
            Expression::Conjunction(e) => fmt::Display::fmt(e, f),
            Expression::Arithmetic(e) => fmt::Display::fmt(e, f),
            Expression::Aggregate(e) => fmt::Display::fmt(e, f),
            Expression::Like(e) => fmt::Display::fmt(e, f),
            Expression::VectorDistance(e) => fmt::Display::fmt(e, f),
            Expression::IsNull(e) => fmt::Display::fmt(e, f),
            Expression::Subquery(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(Expression::value(1).value_type(), AttrType::Ints);
        assert_eq!(Expression::field("t", "v", AttrType::Vectors).value_type(), AttrType::Vectors);
        let cmp = Expression::Comparison(ComparisonExpr::new(CompOp::EqualTo, Expression::value(1), Expression::value(2)));
        assert_eq!(cmp.value_type(), AttrType::Booleans);
        assert_eq!(cmp.expr_type(), ExprType::Comparison);
        assert_eq!(cmp.name(), "1=2");
    }

    #[test]
    fn test_try_get_value() {
        assert_eq!(Expression::value(7).try_get_value().unwrap(), Value::Int(7));
        let field = Expression::field("t", "a", AttrType::Ints);
        assert_eq!(field.try_get_value().unwrap_err().rc(), shoal_core::Rc::InvalidArgument);
        let like = Expression::Like(LikeExpr::like(Expression::value("a"), Expression::value("%")));
        assert_eq!(like.try_get_value().unwrap_err().rc(), shoal_core::Rc::Unimplemented);
    }

    #[test]
    fn test_structural_equal() {
        let a = Expression::field("t", "a", AttrType::Ints);
        let b = Expression::field("t", "a", AttrType::Ints);
        let c = Expression::field("t", "b", AttrType::Ints);
        assert!(a.equal(&b));
        assert!(!a.equal(&c));
        assert!(Expression::value(1).equal(&Expression::value(1.0f32)));
        assert!(!a.equal(&Expression::value(1)));
    }

    #[test]
    fn test_like_has_no_batch_path() {
        let like = Expression::Like(LikeExpr::like(Expression::value("a"), Expression::value("%")));
        assert_eq!(like.get_column(&Chunk::new()).unwrap_err().rc(), shoal_core::Rc::Unimplemented);
    }
}
