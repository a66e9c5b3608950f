//! Attribute types and their type classes.
//!
//! Each attribute type owns a small module of free functions (compare,
//! arithmetic, casting, string codec). [`AttrType`] dispatches to them with a
//! `match`, so adding a type means adding a variant and a module.

mod boolean;
mod chars;
mod date;
mod float;
mod integer;
mod text;
mod vector;

pub use chars::{parse_float_prefix, parse_int_prefix};
pub use date::{format_date, is_valid_date, parse_date};
pub use float::{compare_float, divide_float};
pub use integer::compare_int;
pub use vector::{format_float, parse_vector};

use crate::error::{Error, Result};
use crate::value::{Value, INCOMPARABLE};
use std::fmt;
use std::str::FromStr;

/// Width in bytes of an out-of-line indirection record (TEXT and VECTOR fields).
pub const INDIRECTION_LEN: usize = 16;

/// Supported attribute types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrType {
    /// Type of an untyped NULL literal.
    Undefined,
    /// Fixed-capacity character string.
    Chars,
    /// 32-bit signed integer
    Ints,
    /// 32-bit floating point number
    Floats,
    Booleans,
    /// Calendar date encoded as `YYYYMMDD`.
    Dates,
    /// Variable-length text stored out of line.
    Texts,
    /// Float vector stored out of line.
    Vectors,
}

impl AttrType {
    pub fn name(&self) -> &'static str {
        match self {
            AttrType::Undefined => "undefined",
            AttrType::Chars => "chars",
            AttrType::Ints => "ints",
            AttrType::Floats => "floats",
            AttrType::Booleans => "booleans",
            AttrType::Dates => "dates",
            AttrType::Texts => "texts",
            AttrType::Vectors => "vectors",
        }
    }

    /// Returns true for INTS and FLOATS.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, AttrType::Ints | AttrType::Floats)
    }

    /// Returns true for types whose payload lives outside the record.
    #[inline]
    pub fn is_out_of_line(&self) -> bool {
        matches!(self, AttrType::Texts | AttrType::Vectors)
    }

    /// Inline width of a field of this type, or `None` when the width is
    /// declared per field (CHARS).
    pub fn inline_len(&self) -> Option<usize> {
        match self {
            AttrType::Ints | AttrType::Floats | AttrType::Dates => Some(4),
            AttrType::Booleans => Some(1),
            AttrType::Texts | AttrType::Vectors => Some(INDIRECTION_LEN),
            AttrType::Chars | AttrType::Undefined => None,
        }
    }

    /// Cost of implicitly casting a value of this type to `to`.
    ///
    /// Identity is free; unsupported casts cost `i32::MAX`.
    pub fn cast_cost(&self, to: AttrType) -> i32 {
        if *self == to {
            return 0;
        }
        match self {
            AttrType::Ints => integer::cast_cost(to),
            AttrType::Floats => float::cast_cost(to),
            AttrType::Booleans => boolean::cast_cost(to),
            AttrType::Chars => chars::cast_cost(to),
            AttrType::Dates => date::cast_cost(to),
            AttrType::Texts => text::cast_cost(to),
            AttrType::Vectors => vector::cast_cost(to),
            AttrType::Undefined => 0,
        }
    }

    /// Parses a value of this type from its textual form.
    pub fn value_from_str(&self, data: &str) -> Result<Value> {
        match self {
            AttrType::Ints => integer::set_value_from_str(data),
            AttrType::Floats => float::set_value_from_str(data),
            AttrType::Booleans => boolean::set_value_from_str(data),
            AttrType::Chars => Ok(Value::Chars(data.to_string())),
            AttrType::Dates => date::set_value_from_str(data),
            AttrType::Texts => Ok(Value::Text(data.to_string())),
            AttrType::Vectors => vector::set_value_from_str(data),
            AttrType::Undefined => Err(Error::unimplemented("cannot parse an undefined type")),
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttrType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let t = match s.to_ascii_lowercase().as_str() {
            "chars" | "char" => AttrType::Chars,
            "ints" | "int" => AttrType::Ints,
            "floats" | "float" => AttrType::Floats,
            "booleans" | "boolean" | "bool" => AttrType::Booleans,
            "dates" | "date" => AttrType::Dates,
            "texts" | "text" => AttrType::Texts,
            "vectors" | "vector" => AttrType::Vectors,
            _ => return Err(Error::invalid_argument(format!("unknown attribute type: {s}"))),
        };
        Ok(t)
    }
}

// =========================================================================
// Dispatch
// =========================================================================

/// Three-way comparison dispatched on the left operand's type.
pub(crate) fn compare(left: &Value, right: &Value) -> i32 {
    if left.is_null() || right.is_null() {
        return INCOMPARABLE;
    }
    let cmp = match left.attr_type() {
        AttrType::Ints => integer::compare(left, right),
        AttrType::Floats => float::compare(left, right),
        AttrType::Booleans => boolean::compare(left, right),
        AttrType::Chars => chars::compare(left, right),
        AttrType::Dates => date::compare(left, right),
        AttrType::Texts => text::compare(left, right),
        AttrType::Vectors => vector::compare(left, right),
        AttrType::Undefined => None,
    };
    cmp.unwrap_or_else(|| {
        tracing::warn!(
            left = %left.attr_type(),
            right = %right.attr_type(),
            "comparing values of incompatible types"
        );
        INCOMPARABLE
    })
}

/// Binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Applies `op` with the type class of `result_type`.
pub(crate) fn arithmetic(op: ArithOp, left: &Value, right: &Value, result_type: AttrType) -> Result<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null(result_type));
    }
    match result_type {
        AttrType::Ints => integer::arithmetic(op, left, right),
        AttrType::Floats => float::arithmetic(op, left, right),
        AttrType::Vectors => vector::arithmetic(op, left, right),
        other => Err(Error::unimplemented(format!("arithmetic on {other}"))),
    }
}

pub(crate) fn negative(value: &Value) -> Result<Value> {
    match value {
        Value::Null(t) => Ok(Value::Null(*t)),
        Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
        Value::Float(v) => Ok(Value::Float(-v)),
        Value::Vector(v) => Ok(Value::Vector(v.iter().map(|x| -x).collect())),
        other => Err(Error::unimplemented(format!("negation of {}", other.attr_type()))),
    }
}

pub(crate) fn cast_to(value: &Value, target: AttrType) -> Result<Value> {
    if value.attr_type() == target {
        return Ok(value.clone());
    }
    if value.is_null() {
        return Ok(Value::Null(target));
    }
    match value.attr_type() {
        AttrType::Ints => integer::cast_to(value, target),
        AttrType::Floats => float::cast_to(value, target),
        AttrType::Booleans => boolean::cast_to(value, target),
        AttrType::Chars => chars::cast_to(value, target),
        AttrType::Dates => date::cast_to(value, target),
        AttrType::Texts => text::cast_to(value, target),
        AttrType::Vectors => vector::cast_to(value, target),
        AttrType::Undefined => Err(Error::unimplemented("cast of an undefined value")),
    }
}

pub(crate) fn to_string(value: &Value) -> String {
    match value {
        Value::Null(_) => "NULL".to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => format_float(*v),
        Value::Bool(v) => v.to_string(),
        Value::Chars(s) | Value::Text(s) => s.clone(),
        Value::Date(v) => format_date(*v),
        Value::Vector(v) => vector::to_string(v),
    }
}

fn unsupported_cast(from: AttrType, to: AttrType) -> Error {
    Error::unimplemented(format!("cast from {from} to {to}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_type_from_str() {
        assert_eq!("INTS".parse::<AttrType>().unwrap(), AttrType::Ints);
        assert_eq!("vector".parse::<AttrType>().unwrap(), AttrType::Vectors);
        assert!("blob".parse::<AttrType>().is_err());
    }

    #[test]
    fn test_inline_len() {
        assert_eq!(AttrType::Ints.inline_len(), Some(4));
        assert_eq!(AttrType::Booleans.inline_len(), Some(1));
        assert_eq!(AttrType::Texts.inline_len(), Some(INDIRECTION_LEN));
        assert_eq!(AttrType::Chars.inline_len(), None);
    }

    #[test]
    fn test_identity_cast_is_free() {
        for t in [
            AttrType::Chars,
            AttrType::Ints,
            AttrType::Floats,
            AttrType::Booleans,
            AttrType::Dates,
            AttrType::Texts,
            AttrType::Vectors,
        ] {
            assert_eq!(t.cast_cost(t), 0);
        }
    }

    #[test]
    fn test_vector_cast_cost() {
        assert_eq!(AttrType::Vectors.cast_cost(AttrType::Vectors), 0);
        assert_eq!(AttrType::Vectors.cast_cost(AttrType::Dates), i32::MAX);
        assert_eq!(AttrType::Vectors.cast_cost(AttrType::Chars), i32::MAX);
    }

    #[test]
    fn test_cast_cost_ranks_implicit_casts() {
        assert!(AttrType::Ints.cast_cost(AttrType::Floats) < AttrType::Ints.cast_cost(AttrType::Chars));
        assert_eq!(AttrType::Dates.cast_cost(AttrType::Ints), i32::MAX);
    }
}
