//! TEXTS type class.

use super::{chars::compare_str, unsupported_cast, AttrType};
use crate::error::Result;
use crate::value::Value;

pub(super) fn compare(left: &Value, right: &Value) -> Option<i32> {
    match (left, right) {
        (Value::Text(l), Value::Text(r)) | (Value::Text(l), Value::Chars(r)) => Some(compare_str(l, r)),
        _ => None,
    }
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> Result<Value> {
    match (value, target) {
        (Value::Text(s), AttrType::Chars) => Ok(Value::Chars(s.clone())),
        _ => Err(unsupported_cast(AttrType::Texts, target)),
    }
}

pub(super) fn cast_cost(to: AttrType) -> i32 {
    match to {
        AttrType::Chars => 1,
        _ => i32::MAX,
    }
}
