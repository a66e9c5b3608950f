//! Composite index keys.

use core::cmp::Ordering;
use shoal_core::{Value, INCOMPARABLE};

/// Key of a secondary index: the values of the indexed fields, in index order.
///
/// NULL sorts before every non-NULL value. Values of unrelated types order by
/// their attribute type so that the ordering stays total.
#[derive(Clone, Debug, Default)]
pub struct IndexKey(Vec<Value>);

impl IndexKey {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Returns true if any component is NULL.
    pub fn has_null(&self) -> bool {
        self.0.iter().any(Value::is_null)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for IndexKey {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

fn compare_component(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => match a.compare(b) {
            INCOMPARABLE => a.attr_type().cmp(&b.attr_type()),
            c => c.cmp(&0),
        },
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match compare_component(a, b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_core::AttrType;

    #[test]
    fn test_null_sorts_first() {
        let null = IndexKey::new(vec![Value::Null(AttrType::Ints)]);
        let one = IndexKey::new(vec![Value::Int(1)]);
        assert!(null < one);
        assert!(null.has_null());
        assert!(!one.has_null());
    }

    #[test]
    fn test_composite_order() {
        let a = IndexKey::new(vec![Value::Int(1), Value::Chars("b".into())]);
        let b = IndexKey::new(vec![Value::Int(1), Value::Chars("c".into())]);
        let c = IndexKey::new(vec![Value::Int(2), Value::Chars("a".into())]);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_int_and_float_keys_compare_numerically() {
        let a = IndexKey::new(vec![Value::Int(2)]);
        let b = IndexKey::new(vec![Value::Float(2.5)]);
        assert!(a < b);
    }
}
