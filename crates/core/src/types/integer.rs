//! INTS type class.

use super::{float, unsupported_cast, ArithOp, AttrType};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn compare(left: &Value, right: &Value) -> Option<i32> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Some(compare_int(*l, *r)),
        (Value::Int(l), Value::Float(r)) => Some(float::compare_float(*l as f32, *r)),
        _ => None,
    }
}

#[inline]
pub fn compare_int(left: i32, right: i32) -> i32 {
    match left.cmp(&right) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

pub(super) fn arithmetic(op: ArithOp, left: &Value, right: &Value) -> Result<Value> {
    let (l, r) = (left.get_int(), right.get_int());
    let result = match op {
        ArithOp::Add => l.wrapping_add(r),
        ArithOp::Sub => l.wrapping_sub(r),
        ArithOp::Mul => l.wrapping_mul(r),
        ArithOp::Div => match l.checked_div(r) {
            Some(v) => v,
            None => return Ok(Value::Null(AttrType::Ints)),
        },
    };
    Ok(Value::Int(result))
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> Result<Value> {
    let v = value.get_int();
    match target {
        AttrType::Floats => Ok(Value::Float(v as f32)),
        AttrType::Chars => Ok(Value::Chars(v.to_string())),
        AttrType::Booleans => Ok(Value::Bool(v != 0)),
        _ => Err(unsupported_cast(AttrType::Ints, target)),
    }
}

pub(super) fn cast_cost(to: AttrType) -> i32 {
    match to {
        AttrType::Floats => 1,
        AttrType::Chars | AttrType::Booleans => 2,
        _ => i32::MAX,
    }
}

pub(super) fn set_value_from_str(data: &str) -> Result<Value> {
    data.trim()
        .parse::<i32>()
        .map(Value::Int)
        .map_err(|_| Error::invalid_argument(format!("not an integer: {data:?}")))
}
