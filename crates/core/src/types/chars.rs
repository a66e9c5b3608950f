//! CHARS type class.
//!
//! Numeric conversions from CHARS are best-effort: the longest numeric prefix
//! is used and a string without one converts to zero.

use super::{date, unsupported_cast, vector, AttrType};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn compare(left: &Value, right: &Value) -> Option<i32> {
    match (left, right) {
        (Value::Chars(l), Value::Chars(r)) | (Value::Chars(l), Value::Text(r)) => {
            Some(compare_str(l, r))
        }
        _ => None,
    }
}

#[inline]
pub(super) fn compare_str(left: &str, right: &str) -> i32 {
    match left.as_bytes().cmp(right.as_bytes()) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> Result<Value> {
    let s = match value {
        Value::Chars(s) => s.as_str(),
        _ => return Err(Error::internal("chars type class given a non-chars value")),
    };
    match target {
        AttrType::Ints => Ok(Value::Int(value.get_int())),
        AttrType::Floats => Ok(Value::Float(value.get_float())),
        AttrType::Booleans => Ok(Value::Bool(value.get_boolean())),
        AttrType::Texts => Ok(Value::Text(s.to_string())),
        AttrType::Dates => {
            let date = Value::Date(date::parse_date(s));
            if !date.is_date_valid() {
                return Err(Error::invalid_argument(format!("invalid date: {s:?}")));
            }
            Ok(date)
        }
        AttrType::Vectors => vector::parse_vector(s).map(Value::Vector),
        _ => Err(unsupported_cast(AttrType::Chars, target)),
    }
}

pub(super) fn cast_cost(to: AttrType) -> i32 {
    match to {
        AttrType::Dates | AttrType::Texts | AttrType::Vectors => 1,
        AttrType::Ints | AttrType::Floats => 2,
        AttrType::Booleans => 3,
        _ => i32::MAX,
    }
}

/// Parses the leading integer of `s`, skipping leading whitespace.
///
/// Returns `None` when `s` has no numeric prefix. Out-of-range values
/// saturate at `i32::MIN`/`i32::MAX`.
pub fn parse_int_prefix(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    let saturated = if bytes[0] == b'-' { i64::MIN } else { i64::MAX };
    let value = s[..end].parse::<i64>().unwrap_or(saturated);
    Some(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Parses the leading decimal float of `s`, skipping leading whitespace.
pub fn parse_float_prefix(s: &str) -> Option<f32> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let rest = s[end..].to_ascii_lowercase();
    for word in ["infinity", "inf", "nan"] {
        if rest.starts_with(word) {
            return s[..end + word.len()].parse::<f32>().ok();
        }
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  -7abc"), Some(-7));
        assert_eq!(parse_int_prefix("3.9"), Some(3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("3000000000"), Some(i32::MAX));
        assert_eq!(parse_int_prefix("-3000000000x"), Some(i32::MIN));
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i32::MAX));
        assert_eq!(parse_int_prefix("-99999999999999999999999"), Some(i32::MIN));
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("1.5"), Some(1.5));
        assert_eq!(parse_float_prefix(" 2.5kg"), Some(2.5));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("x1"), None);
        assert!(parse_float_prefix("inf").unwrap().is_infinite());
    }

    #[test]
    fn test_chars_to_date() {
        let v = cast_to(&Value::Chars("2024-2-9".into()), AttrType::Dates).unwrap();
        assert_eq!(v, Value::Date(20240209));

        let err = cast_to(&Value::Chars("2023-02-29".into()), AttrType::Dates).unwrap_err();
        assert_eq!(err.rc(), crate::Rc::InvalidArgument);
    }

    #[test]
    fn test_chars_to_vector() {
        let v = cast_to(&Value::Chars("[1, 2.5]".into()), AttrType::Vectors).unwrap();
        assert_eq!(v, Value::Vector(vec![1.0, 2.5]));
    }

    #[test]
    fn test_chars_compare() {
        assert_eq!(compare(&Value::Chars("a".into()), &Value::Chars("b".into())), Some(-1));
        assert_eq!(compare(&Value::Chars("ab".into()), &Value::Text("ab".into())), Some(0));
        assert_eq!(compare(&Value::Chars("ab".into()), &Value::Int(1)), None);
    }
}
