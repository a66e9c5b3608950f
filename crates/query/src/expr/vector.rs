use super::Expression;
use crate::tuple::Tuple;
use shoal_core::{AttrType, Error, Result, Value};
use shoal_index::DistanceMetric;
use std::fmt;

/// Distance between two VECTORS operands. The result is FLOATS; a NULL
/// operand gives a NULL.
#[derive(Debug)]
pub struct VectorDistanceExpr {
    metric: DistanceMetric,
    left: Box<Expression>,
    right: Box<Expression>,
}

impl VectorDistanceExpr {
    pub fn new(metric: DistanceMetric, left: Expression, right: Expression) -> Self {
        Self {
            metric,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }

    pub fn equal(&self, other: &VectorDistanceExpr) -> bool {
        self.metric == other.metric && self.left.equal(&other.left) && self.right.equal(&other.right)
    }

    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        let left = self.left.get_value(tuple)?;
        let right = self.right.get_value(tuple)?;
        if left.is_null() || right.is_null() {
            return Ok(Value::Null(AttrType::Floats));
        }
        match (left.get_vector(), right.get_vector()) {
            (Some(l), Some(r)) => Ok(Value::Float(self.metric.distance(l, r)?)),
            _ => {
                tracing::warn!(left = %left.attr_type(), right = %right.attr_type(), "vector distance over non-vector operands");
                Err(Error::invalid_argument(format!(
                    "{} expects vectors, got {} and {}",
                    self.metric.name(),
                    left.attr_type(),
                    right.attr_type()
                )))
            }
        }
    }
}

impl fmt::Display for VectorDistanceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.metric.name(), self.left, self.right)
    }
}
