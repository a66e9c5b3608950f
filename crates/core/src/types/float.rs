//! FLOATS type class.

use super::{unsupported_cast, ArithOp, AttrType};
use crate::error::{Error, Result};
use crate::value::{Value, EPSILON};

pub(super) fn compare(left: &Value, right: &Value) -> Option<i32> {
    match (left, right) {
        (Value::Float(l), Value::Float(r)) => Some(compare_float(*l, *r)),
        (Value::Float(l), Value::Int(r)) => Some(compare_float(*l, *r as f32)),
        _ => None,
    }
}

/// Compares two floats, treating values within `EPSILON` as equal.
#[inline]
pub fn compare_float(left: f32, right: f32) -> i32 {
    let diff = left - right;
    if diff > EPSILON {
        1
    } else if diff < -EPSILON {
        -1
    } else {
        0
    }
}

/// Float division shared by the row and batch evaluators.
///
/// A divisor within `EPSILON` of zero yields `f32::MAX`.
#[inline]
pub fn divide_float(left: f32, right: f32) -> f32 {
    if right > -EPSILON && right < EPSILON {
        f32::MAX
    } else {
        left / right
    }
}

pub(super) fn arithmetic(op: ArithOp, left: &Value, right: &Value) -> Result<Value> {
    let (l, r) = (left.get_float(), right.get_float());
    let result = match op {
        ArithOp::Add => l + r,
        ArithOp::Sub => l - r,
        ArithOp::Mul => l * r,
        ArithOp::Div => divide_float(l, r),
    };
    Ok(Value::Float(result))
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> Result<Value> {
    let v = value.get_float();
    match target {
        AttrType::Ints => Ok(Value::Int(v as i32)),
        AttrType::Chars => Ok(Value::Chars(super::format_float(v))),
        AttrType::Booleans => Ok(Value::Bool(value.get_boolean())),
        _ => Err(unsupported_cast(AttrType::Floats, target)),
    }
}

pub(super) fn cast_cost(to: AttrType) -> i32 {
    match to {
        AttrType::Ints => 1,
        AttrType::Chars | AttrType::Booleans => 2,
        _ => i32::MAX,
    }
}

pub(super) fn set_value_from_str(data: &str) -> Result<Value> {
    data.trim()
        .parse::<f32>()
        .map(Value::Float)
        .map_err(|_| Error::invalid_argument(format!("not a float: {data:?}")))
}
