//! Value type definitions for Shoal.
//!
//! [`Value`] is the runtime cell of every expression and tuple. A NULL keeps
//! its declared type so that casts and arithmetic on it stay typed.

use crate::error::{Error, Result};
use crate::types::{self, parse_date, parse_float_prefix, parse_int_prefix, ArithOp, AttrType};
use std::fmt;

/// Comparison code returned when either operand is NULL or the operands
/// cannot be compared. Callers must check for it before mapping a comparison
/// to a boolean.
pub const INCOMPARABLE: i32 = i32::MAX;

/// Tolerance used for float equality and float truthiness.
pub const EPSILON: f32 = 1e-6;

/// A value that can be stored in a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// NULL of the given declared type.
    Null(AttrType),
    Int(i32),
    Float(f32),
    Bool(bool),
    /// Fixed-capacity character string.
    Chars(String),
    /// Date encoded as `YYYYMMDD`.
    Date(i32),
    Text(String),
    Vector(Vec<f32>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null(AttrType::Undefined)
    }
}

impl Value {
    /// Creates a NULL of the given type.
    #[inline]
    pub fn null(attr_type: AttrType) -> Self {
        Value::Null(attr_type)
    }

    /// Creates a date from a `Y-M-D` string, zero-padding single-digit parts.
    ///
    /// The result is not validated; see [`Value::is_date_valid`].
    pub fn date_from_str(s: &str) -> Self {
        Value::Date(parse_date(s))
    }

    /// Parses `data` as a value of `attr_type`.
    pub fn from_str_typed(attr_type: AttrType, data: &str) -> Result<Self> {
        attr_type.value_from_str(data)
    }

    /// Decodes an inline field image.
    ///
    /// TEXT and VECTOR fields hold an indirection record and must be decoded
    /// through the payload store instead.
    pub fn from_raw(attr_type: AttrType, data: &[u8]) -> Result<Self> {
        let word = || -> Result<[u8; 4]> {
            data.get(..4)
                .and_then(|b| b.try_into().ok())
                .ok_or_else(|| Error::internal(format!("field image of {} bytes is too short", data.len())))
        };
        let value = match attr_type {
            AttrType::Ints => Value::Int(i32::from_le_bytes(word()?)),
            AttrType::Floats => Value::Float(f32::from_le_bytes(word()?)),
            AttrType::Dates => Value::Date(i32::from_le_bytes(word()?)),
            AttrType::Booleans => Value::Bool(data.first().copied().unwrap_or(0) != 0),
            AttrType::Chars => {
                let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
                Value::Chars(String::from_utf8_lossy(&data[..end]).into_owned())
            }
            AttrType::Texts | AttrType::Vectors | AttrType::Undefined => {
                return Err(Error::internal(format!("{attr_type} has no inline image")));
            }
        };
        Ok(value)
    }

    /// Returns the attribute type; a NULL reports its declared type.
    pub fn attr_type(&self) -> AttrType {
        match self {
            Value::Null(t) => *t,
            Value::Int(_) => AttrType::Ints,
            Value::Float(_) => AttrType::Floats,
            Value::Bool(_) => AttrType::Booleans,
            Value::Chars(_) => AttrType::Chars,
            Value::Date(_) => AttrType::Dates,
            Value::Text(_) => AttrType::Texts,
            Value::Vector(_) => AttrType::Vectors,
        }
    }

    /// Returns true if this value is NULL.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    /// Payload length in bytes.
    pub fn length(&self) -> usize {
        match self {
            Value::Null(_) => 0,
            Value::Int(_) | Value::Float(_) | Value::Date(_) => 4,
            Value::Bool(_) => 1,
            Value::Chars(s) | Value::Text(s) => s.len(),
            Value::Vector(v) => v.len() * std::mem::size_of::<f32>(),
        }
    }

    /// Little-endian inline image of this value.
    ///
    /// A NULL yields a zero-filled image of its type's inline width so that
    /// copying it never exposes stale bytes.
    pub fn raw_bytes(&self) -> Vec<u8> {
        match self {
            Value::Null(t) => vec![0; t.inline_len().unwrap_or(0)],
            Value::Int(v) | Value::Date(v) => v.to_le_bytes().to_vec(),
            Value::Float(v) => v.to_le_bytes().to_vec(),
            Value::Bool(v) => vec![*v as u8],
            Value::Chars(s) | Value::Text(s) => s.as_bytes().to_vec(),
            Value::Vector(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        }
    }

    // =========================================================================
    // Coercing accessors
    // =========================================================================

    /// Integer view of this value. CHARS parse best-effort and fall back to 0.
    pub fn get_int(&self) -> i32 {
        match self {
            Value::Int(v) | Value::Date(v) => *v,
            Value::Float(v) => *v as i32,
            Value::Bool(v) => *v as i32,
            Value::Chars(s) => parse_int_prefix(s).unwrap_or_else(|| {
                tracing::trace!(s = %s, "failed to convert string to number");
                0
            }),
            other => {
                tracing::warn!(attr_type = %other.attr_type(), "no integer view of value");
                0
            }
        }
    }

    /// Float view of this value. CHARS parse best-effort and fall back to 0.0.
    pub fn get_float(&self) -> f32 {
        match self {
            Value::Int(v) => *v as f32,
            Value::Float(v) => *v,
            Value::Bool(v) => *v as i32 as f32,
            Value::Chars(s) => parse_float_prefix(s).unwrap_or_else(|| {
                tracing::trace!(s = %s, "failed to convert string to float");
                0.0
            }),
            other => {
                tracing::warn!(attr_type = %other.attr_type(), "no float view of value");
                0.0
            }
        }
    }

    /// Truthiness of this value.
    ///
    /// A numeric string is true when its float parse is outside `EPSILON` or
    /// its integer parse is non-zero; any other present string is also true.
    pub fn get_boolean(&self) -> bool {
        match self {
            Value::Bool(v) => *v,
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v >= EPSILON || *v <= -EPSILON,
            Value::Chars(s) => {
                if let Some(f) = parse_float_prefix(s) {
                    if f >= EPSILON || f <= -EPSILON {
                        return true;
                    }
                    if parse_int_prefix(s).unwrap_or(0) != 0 {
                        return true;
                    }
                } else {
                    tracing::trace!(s = %s, "failed to convert string to float or integer");
                }
                true
            }
            Value::Null(_) => false,
            other => {
                tracing::warn!(attr_type = %other.attr_type(), "no boolean view of value");
                false
            }
        }
    }

    /// String form of this value.
    #[inline]
    pub fn get_string(&self) -> String {
        types::to_string(self)
    }

    /// Returns the vector payload, or `None` if this is not a vector.
    pub fn get_vector(&self) -> Option<&[f32]> {
        match self {
            Value::Vector(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Returns the string payload of CHARS and TEXT values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Chars(s) | Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    // =========================================================================
    // Type class operations
    // =========================================================================

    /// Three-way comparison: -1, 0 or 1, or [`INCOMPARABLE`] when either side
    /// is NULL or the types cannot be compared.
    pub fn compare(&self, other: &Value) -> i32 {
        types::compare(self, other)
    }

    pub fn add(left: &Value, right: &Value, result_type: AttrType) -> Result<Value> {
        types::arithmetic(ArithOp::Add, left, right, result_type)
    }

    pub fn subtract(left: &Value, right: &Value, result_type: AttrType) -> Result<Value> {
        types::arithmetic(ArithOp::Sub, left, right, result_type)
    }

    pub fn multiply(left: &Value, right: &Value, result_type: AttrType) -> Result<Value> {
        types::arithmetic(ArithOp::Mul, left, right, result_type)
    }

    pub fn divide(left: &Value, right: &Value, result_type: AttrType) -> Result<Value> {
        types::arithmetic(ArithOp::Div, left, right, result_type)
    }

    pub fn negative(value: &Value) -> Result<Value> {
        types::negative(value)
    }

    /// The greater of two values; the right one wins ties and NULLs.
    pub fn max(left: &Value, right: &Value) -> Value {
        let cmp = left.compare(right);
        if cmp != INCOMPARABLE && cmp > 0 {
            left.clone()
        } else {
            right.clone()
        }
    }

    /// The lesser of two values; the right one wins ties and NULLs.
    pub fn min(left: &Value, right: &Value) -> Value {
        let cmp = left.compare(right);
        if cmp != INCOMPARABLE && cmp < 0 {
            left.clone()
        } else {
            right.clone()
        }
    }

    /// Casts this value to `target`. Identity casts clone; NULL stays NULL.
    pub fn cast_to(&self, target: AttrType) -> Result<Value> {
        types::cast_to(self, target)
    }

    /// Returns true for a NULL or a date between 1900-01-01 and 2100-12-31.
    ///
    /// Non-date values are checked through their integer view.
    pub fn is_date_valid(&self) -> bool {
        if self.is_null() {
            return true;
        }
        types::is_valid_date(self.get_int())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&types::to_string(self))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Chars(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Chars(v)
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Value::Vector(v)
    }
}
