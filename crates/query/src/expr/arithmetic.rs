use super::{kernel, Expression};
use crate::chunk::{Chunk, Column, ColumnData};
use crate::tuple::Tuple;
use shoal_core::types::divide_float;
use shoal_core::{AttrType, Error, Result, Value};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithmeticType {
    Add,
    Sub,
    Mul,
    Div,
    Negative,
}

impl ArithmeticType {
    fn symbol(&self) -> &'static str {
        match self {
            ArithmeticType::Add => "+",
            ArithmeticType::Sub | ArithmeticType::Negative => "-",
            ArithmeticType::Mul => "*",
            ArithmeticType::Div => "/",
        }
    }
}

/// Binary arithmetic or unary negation.
///
/// INTS op INTS stays INTS except for division, VECTORS op VECTORS stays
/// VECTORS, everything else computes in FLOATS.
#[derive(Debug)]
pub struct ArithmeticExpr {
    arithmetic_type: ArithmeticType,
    left: Box<Expression>,
    right: Option<Box<Expression>>,
}

impl ArithmeticExpr {
    pub fn new(arithmetic_type: ArithmeticType, left: Expression, right: Option<Expression>) -> Self {
        Self {
            arithmetic_type,
            left: Box::new(left),
            right: right.map(Box::new),
        }
    }

    pub fn negative(child: Expression) -> Self {
        Self::new(ArithmeticType::Negative, child, None)
    }

    pub fn arithmetic_type(&self) -> ArithmeticType {
        self.arithmetic_type
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> Option<&Expression> {
        self.right.as_deref()
    }

    pub fn value_type(&self) -> AttrType {
        let left = self.left.value_type();
        let Some(right) = self.right.as_ref().map(|r| r.value_type()) else {
            return left;
        };
        match (left, right) {
            (AttrType::Ints, AttrType::Ints) if self.arithmetic_type != ArithmeticType::Div => AttrType::Ints,
            (AttrType::Vectors, AttrType::Vectors) => AttrType::Vectors,
            _ => AttrType::Floats,
        }
    }

    pub fn equal(&self, other: &ArithmeticExpr) -> bool {
        if self.arithmetic_type != other.arithmetic_type || !self.left.equal(&other.left) {
            return false;
        }
        match (&self.right, &other.right) {
            (Some(a), Some(b)) => a.equal(b),
            (None, None) => true,
            _ => false,
        }
    }

    fn right_operand(&self) -> Result<&Expression> {
        self.right.as_deref().ok_or_else(|| {
            Error::internal(format!("{:?} without a right operand", self.arithmetic_type))
        })
    }

    fn calc_value(&self, left: &Value, right: Option<&Value>) -> Result<Value> {
        let target = self.value_type();
        if self.arithmetic_type == ArithmeticType::Negative {
            return Value::negative(left);
        }
        let right = right.ok_or_else(|| Error::internal("binary arithmetic without a right value"))?;
        match self.arithmetic_type {
            ArithmeticType::Add => Value::add(left, right, target),
            ArithmeticType::Sub => Value::subtract(left, right, target),
            ArithmeticType::Mul => Value::multiply(left, right, target),
            ArithmeticType::Div => Value::divide(left, right, target),
            ArithmeticType::Negative => Value::negative(left),
        }
    }

    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        let left = self.left.get_value(tuple)?;
        let right = match self.arithmetic_type {
            ArithmeticType::Negative => None,
            _ => Some(self.right_operand()?.get_value(tuple)?),
        };
        self.calc_value(&left, right.as_ref())
    }

    pub fn try_get_value(&self) -> Result<Value> {
        let left = self.left.try_get_value()?;
        let right = match self.arithmetic_type {
            ArithmeticType::Negative => None,
            _ => Some(self.right_operand()?.try_get_value()?),
        };
        self.calc_value(&left, right.as_ref())
    }

    pub fn get_column(&self, chunk: &Chunk) -> Result<Column> {
        let target = self.value_type();
        if !matches!(target, AttrType::Ints | AttrType::Floats) {
            return Err(Error::unimplemented(format!("vectorized arithmetic on {target}")));
        }
        let left = self.left.get_column(chunk)?;
        kernel::check_no_nulls(&left)?;

        if self.arithmetic_type == ArithmeticType::Negative {
            let data = match left.data() {
                ColumnData::Ints(v) => ColumnData::Ints(kernel::unary(v, i32::wrapping_neg)),
                ColumnData::Floats(v) => ColumnData::Floats(kernel::unary(v, |x: f32| -x)),
                _ => return Err(Error::unimplemented(format!("vectorized negation of {}", left.attr_type()))),
            };
            return Ok(Column::from_data(target, 4, left.kind(), data));
        }

        let right = self.right_operand()?.get_column(chunk)?;
        kernel::check_no_nulls(&right)?;
        kernel::check_rows(&left, &right)?;
        let (lc, rc) = (left.is_constant(), right.is_constant());
        let data = match target {
            AttrType::Ints => {
                let (Some(l), Some(r)) = (left.ints(), right.ints()) else {
                    return Err(Error::internal("INTS arithmetic over non-INTS columns"));
                };
                let values = match self.arithmetic_type {
                    ArithmeticType::Add => kernel::binary(l, lc, r, rc, i32::wrapping_add),
                    ArithmeticType::Sub => kernel::binary(l, lc, r, rc, i32::wrapping_sub),
                    ArithmeticType::Mul => kernel::binary(l, lc, r, rc, i32::wrapping_mul),
                    _ => return Err(Error::internal("INTS division")),
                };
                ColumnData::Ints(values)
            }
            _ => {
                let (l, r) = (kernel::as_floats(&left)?, kernel::as_floats(&right)?);
                let values = match self.arithmetic_type {
                    ArithmeticType::Add => kernel::binary(&l, lc, &r, rc, |a, b| a + b),
                    ArithmeticType::Sub => kernel::binary(&l, lc, &r, rc, |a, b| a - b),
                    ArithmeticType::Mul => kernel::binary(&l, lc, &r, rc, |a, b| a * b),
                    _ => kernel::binary(&l, lc, &r, rc, divide_float),
                };
                ColumnData::Floats(values)
            }
        };
        Ok(Column::from_data(target, 4, kernel::result_kind(&left, &right), data))
    }
}

impl fmt::Display for ArithmeticExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.right {
            Some(right) => write!(f, "{}{}{}", self.left, self.arithmetic_type.symbol(), right),
            None => write!(f, "-{}", self.left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::{TupleCellSpec, ValueListTuple};

    fn arith(t: ArithmeticType, l: Value, r: Value) -> ArithmeticExpr {
        ArithmeticExpr::new(t, Expression::value(l), Some(Expression::value(r)))
    }

    #[test]
    fn test_result_type_promotion() {
        assert_eq!(arith(ArithmeticType::Add, Value::Int(1), Value::Int(2)).value_type(), AttrType::Ints);
        assert_eq!(arith(ArithmeticType::Div, Value::Int(1), Value::Int(2)).value_type(), AttrType::Floats);
        assert_eq!(arith(ArithmeticType::Mul, Value::Int(1), Value::Float(2.0)).value_type(), AttrType::Floats);
        assert_eq!(
            arith(ArithmeticType::Add, Value::Vector(vec![1.0]), Value::Vector(vec![2.0])).value_type(),
            AttrType::Vectors
        );
    }

    #[test]
    fn test_row_evaluation() {
        let empty = ValueListTuple::default();
        assert_eq!(arith(ArithmeticType::Add, Value::Int(1), Value::Int(2)).get_value(&empty).unwrap(), Value::Int(3));
        assert_eq!(arith(ArithmeticType::Div, Value::Int(3), Value::Int(2)).get_value(&empty).unwrap(), Value::Float(1.5));
        assert_eq!(
            arith(ArithmeticType::Sub, Value::Int(1), Value::Null(AttrType::Ints)).get_value(&empty).unwrap(),
            Value::Null(AttrType::Ints)
        );
        let neg = ArithmeticExpr::negative(Expression::value(4));
        assert_eq!(neg.try_get_value().unwrap(), Value::Int(-4));
        assert_eq!(neg.to_string(), "-4");
    }

    #[test]
    fn test_vector_length_mismatch() {
        let expr = arith(ArithmeticType::Add, Value::Vector(vec![1.0, 2.0]), Value::Vector(vec![1.0]));
        assert_eq!(expr.try_get_value().unwrap_err().rc(), shoal_core::Rc::InvalidArgument);
    }

    #[test]
    fn test_missing_right_operand() {
        let expr = ArithmeticExpr::new(ArithmeticType::Add, Expression::value(1), None);
        assert_eq!(expr.try_get_value().unwrap_err().rc(), shoal_core::Rc::Internal);
    }

    #[test]
    fn test_batch_matches_rows() {
        let mut chunk = Chunk::new();
        let mut a = Column::with_capacity(AttrType::Ints, 4, 8);
        let mut b = Column::with_capacity(AttrType::Floats, 4, 8);
        let rows = [(1, 0.5f32), (-4, 2.0), (7, 0.0)];
        for (x, y) in rows {
            a.append_value(&Value::Int(x)).unwrap();
            b.append_value(&Value::Float(y)).unwrap();
        }
        chunk.add_column(a);
        chunk.add_column(b);

        let field = |name: &str, t, pos| {
            let mut f = crate::expr::FieldExpr::new("t", name, t);
            f.set_pos(pos);
            Expression::Field(f)
        };
        for op in [ArithmeticType::Add, ArithmeticType::Sub, ArithmeticType::Mul, ArithmeticType::Div] {
            let expr = ArithmeticExpr::new(op, field("a", AttrType::Ints, 0), Some(field("b", AttrType::Floats, 1)));
            let column = expr.get_column(&chunk).unwrap();
            for (i, (x, y)) in rows.iter().enumerate() {
                let tuple = ValueListTuple::new(
                    vec![Value::Int(*x), Value::Float(*y)],
                    vec![TupleCellSpec::new("t", "a"), TupleCellSpec::new("t", "b")],
                );
                assert_eq!(column.get_value(i).unwrap(), expr.get_value(&tuple).unwrap(), "{op:?} row {i}");
            }
        }
    }

    #[test]
    fn test_batch_rejects_vectors() {
        let expr = arith(ArithmeticType::Add, Value::Vector(vec![1.0]), Value::Vector(vec![2.0]));
        assert_eq!(expr.get_column(&Chunk::new()).unwrap_err().rc(), shoal_core::Rc::Unimplemented);
    }
}
