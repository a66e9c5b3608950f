//! VECTORS type class.
//!
//! Vectors compare lexicographically and support elementwise ADD/SUB/MUL
//! between operands of equal length.

use super::{integer::compare_int, unsupported_cast, ArithOp, AttrType};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn compare(left: &Value, right: &Value) -> Option<i32> {
    match (left, right) {
        (Value::Vector(l), Value::Vector(r)) => Some(compare_vectors(l, r)),
        _ => None,
    }
}

fn compare_vectors(left: &[f32], right: &[f32]) -> i32 {
    for (l, r) in left.iter().zip(right) {
        if l < r {
            return -1;
        }
        if l > r {
            return 1;
        }
    }
    compare_int(left.len() as i32, right.len() as i32)
}

pub(super) fn arithmetic(op: ArithOp, left: &Value, right: &Value) -> Result<Value> {
    let (l, r) = match (left, right) {
        (Value::Vector(l), Value::Vector(r)) => (l, r),
        _ => return Err(Error::invalid_argument("vector arithmetic on non-vector operands")),
    };
    if l.len() != r.len() {
        return Err(Error::invalid_argument(format!(
            "vector length mismatch: {} vs {}",
            l.len(),
            r.len()
        )));
    }
    let f: fn(f32, f32) -> f32 = match op {
        ArithOp::Add => |a, b| a + b,
        ArithOp::Sub => |a, b| a - b,
        ArithOp::Mul => |a, b| a * b,
        ArithOp::Div => return Err(Error::unimplemented("vector division")),
    };
    Ok(Value::Vector(l.iter().zip(r).map(|(a, b)| f(*a, *b)).collect()))
}

pub(super) fn cast_to(_value: &Value, target: AttrType) -> Result<Value> {
    Err(unsupported_cast(AttrType::Vectors, target))
}

/// Vectors only convert to themselves.
pub(super) fn cast_cost(to: AttrType) -> i32 {
    match to {
        AttrType::Vectors => 0,
        _ => i32::MAX,
    }
}

pub(super) fn set_value_from_str(data: &str) -> Result<Value> {
    parse_vector(data).map(Value::Vector)
}

/// Parses `[a,b,...]` (brackets optional) into a vector.
pub fn parse_vector(s: &str) -> Result<Vec<f32>> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed)
        .trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|_| Error::invalid_argument(format!("invalid vector element {part:?} in {s:?}")))
        })
        .collect()
}

/// Formats a float with at most two decimals, trimming trailing zeros.
pub fn format_float(v: f32) -> String {
    let mut s = format!("{v:.2}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    s
}

/// Renders `[1,2.5]`; rendering stops at the first NaN element.
pub(super) fn to_string(v: &[f32]) -> String {
    let parts: Vec<String> = v
        .iter()
        .take_while(|x| !x.is_nan())
        .map(|x| format_float(*x))
        .collect();
    format!("[{}]", parts.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_compare_lexicographic() {
        assert_eq!(compare_vectors(&[1.0, 2.0], &[1.0, 3.0]), -1);
        assert_eq!(compare_vectors(&[1.0, 2.0, 0.0], &[1.0, 2.0]), 1);
        assert_eq!(compare_vectors(&[1.0], &[1.0, 0.0]), -1);
        assert_eq!(compare_vectors(&[], &[]), 0);
    }

    #[test]
    fn test_vector_arithmetic_length_mismatch() {
        let l = Value::Vector(vec![1.0, 2.0]);
        let r = Value::Vector(vec![1.0]);
        for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul] {
            let err = arithmetic(op, &l, &r).unwrap_err();
            assert_eq!(err.rc(), crate::Rc::InvalidArgument);
        }
    }

    #[test]
    fn test_vector_elementwise() {
        let l = Value::Vector(vec![1.0, 2.0]);
        let r = Value::Vector(vec![3.0, 4.0]);
        assert_eq!(arithmetic(ArithOp::Add, &l, &r).unwrap(), Value::Vector(vec![4.0, 6.0]));
        assert_eq!(arithmetic(ArithOp::Sub, &l, &r).unwrap(), Value::Vector(vec![-2.0, -2.0]));
        assert_eq!(arithmetic(ArithOp::Mul, &l, &r).unwrap(), Value::Vector(vec![3.0, 8.0]));
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(10.0), "10");
        assert_eq!(format_float(1.23456), "1.23");
        assert_eq!(format_float(0.0), "0");
    }

    #[test]
    fn test_vector_to_string() {
        assert_eq!(to_string(&[1.0, 2.5, 3.333]), "[1,2.5,3.33]");
        assert_eq!(to_string(&[1.0, f32::NAN, 2.0]), "[1]");
        assert_eq!(to_string(&[]), "[]");
    }

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("[1,2,3]").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(parse_vector(" [ 0.5 , -1 ] ").unwrap(), vec![0.5, -1.0]);
        assert_eq!(parse_vector("[]").unwrap(), Vec::<f32>::new());
        assert!(parse_vector("[1,x]").is_err());
    }
}
