//! BOOLEANS type class.

use super::{integer::compare_int, unsupported_cast, AttrType};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn compare(left: &Value, right: &Value) -> Option<i32> {
    match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => Some(compare_int(*l as i32, *r as i32)),
        _ => None,
    }
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> Result<Value> {
    let v = value.get_boolean();
    match target {
        AttrType::Ints => Ok(Value::Int(v as i32)),
        AttrType::Floats => Ok(Value::Float(v as i32 as f32)),
        _ => Err(unsupported_cast(AttrType::Booleans, target)),
    }
}

pub(super) fn cast_cost(to: AttrType) -> i32 {
    match to {
        AttrType::Ints => 1,
        AttrType::Floats => 2,
        _ => i32::MAX,
    }
}

pub(super) fn set_value_from_str(data: &str) -> Result<Value> {
    match data.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(Value::Bool(true)),
        "false" | "0" => Ok(Value::Bool(false)),
        _ => Err(Error::invalid_argument(format!("not a boolean: {data:?}"))),
    }
}
