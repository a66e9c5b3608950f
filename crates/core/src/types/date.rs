//! DATES type class.
//!
//! A date is stored as the integer `YYYYMMDD` and rendered as `YYYY-MM-DD`.

use super::{integer::compare_int, unsupported_cast, AttrType};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn compare(left: &Value, right: &Value) -> Option<i32> {
    match (left, right) {
        (Value::Date(l), Value::Date(r)) => Some(compare_int(*l, *r)),
        _ => None,
    }
}

pub(super) fn cast_to(_value: &Value, target: AttrType) -> Result<Value> {
    Err(unsupported_cast(AttrType::Dates, target))
}

pub(super) fn cast_cost(_to: AttrType) -> i32 {
    i32::MAX
}

pub(super) fn set_value_from_str(data: &str) -> Result<Value> {
    let date = parse_date(data);
    if !is_valid_date(date) {
        return Err(Error::invalid_argument(format!("invalid date: {data:?}")));
    }
    Ok(Value::Date(date))
}

/// Encodes a `Y-M-D` string as `YYYYMMDD`, zero-padding single-digit parts.
///
/// Non-numeric input encodes as 0, which is never a valid date.
pub fn parse_date(s: &str) -> i32 {
    let mut packed = String::with_capacity(8);
    for part in s.trim().split('-') {
        if part.len() == 1 {
            packed.push('0');
        }
        packed.push_str(part);
    }
    super::parse_int_prefix(&packed).unwrap_or(0)
}

/// Renders a `YYYYMMDD` integer as `YYYY-MM-DD`.
pub fn format_date(date: i32) -> String {
    format!("{:04}-{:02}-{:02}", date / 10000, (date % 10000) / 100, date % 100)
}

/// Returns true if `date` names a real day between 1900-01-01 and 2100-12-31.
pub fn is_valid_date(date: i32) -> bool {
    let year = date / 10000;
    let month = (date % 10000) / 100;
    let day = date % 100;
    if !(1900..=2100).contains(&year) || !(1..=12).contains(&month) || day < 1 {
        return false;
    }
    let max_day = match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    };
    day <= max_day
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
