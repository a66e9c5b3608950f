//! Tuples: the logical rows expressions are evaluated against.
//!
//! Tuples nest. `SELECT t1.a + t2.b FROM t1, t2` reads through
//!
//! ```text
//!   Project(t1.a + t2.b)
//!          |
//!        Joined
//!        /    \
//!   Row(t1)  Row(t2)
//! ```
//!
//! A `RowTuple` is a view over a stored record and never owns it; anything
//! that must outlive the producing operator's next `next()` call is
//! snapshotted into a `ValueListTuple`.

mod joined;
mod project;
mod row;
mod value_list;

pub use joined::JoinedTuple;
pub use project::ProjectTuple;
pub use row::RowTuple;
pub use value_list::ValueListTuple;

use shoal_core::{Result, Rid, Value};

/// Describes one cell of a tuple.
///
/// A cell produced from a table field carries the table and field names; a
/// derived cell (an aggregate, a projected expression) carries only an alias.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TupleCellSpec {
    table_name: String,
    field_name: String,
    alias: String,
}

impl TupleCellSpec {
    pub fn new(table_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        let table_name = table_name.into();
        let field_name = field_name.into();
        let alias = if table_name.is_empty() {
            field_name.clone()
        } else {
            format!("{table_name}.{field_name}")
        };
        Self {
            table_name,
            field_name,
            alias,
        }
    }

    pub fn with_alias(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..Default::default()
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Field specs match on table and field; alias-only specs match on alias.
    pub fn equals(&self, other: &TupleCellSpec) -> bool {
        if !self.field_name.is_empty() && !other.field_name.is_empty() {
            return self.table_name == other.table_name && self.field_name == other.field_name;
        }
        self.alias == other.alias
    }
}

/// A row exposed to expressions.
pub trait Tuple {
    fn cell_count(&self) -> usize;

    fn cell_at(&self, index: usize) -> Result<Value>;

    fn spec_at(&self, index: usize) -> Result<TupleCellSpec>;

    /// Looks a cell up by its description. A miss is `NotFound`.
    fn find_cell(&self, spec: &TupleCellSpec) -> Result<Value>;

    /// Physical record the tuple was read from, if any.
    fn raw_rid(&self) -> Option<Rid> {
        None
    }

    /// Table the tuple was read from, if any.
    fn raw_table_name(&self) -> Option<&str> {
        None
    }

    /// Cells rendered and joined by `", "`.
    fn to_string(&self) -> String {
        let mut out = String::new();
        for i in 0..self.cell_count() {
            if i > 0 {
                out.push_str(", ");
            }
            match self.cell_at(i) {
                Ok(cell) => out.push_str(&cell.to_string()),
                Err(e) => out.push_str(&format!("<{}>", e.rc())),
            }
        }
        out
    }

    /// Orders by cell count, then cell by cell. Two NULLs compare equal so
    /// that grouping puts them together.
    fn compare(&self, other: &dyn Tuple) -> Result<i32> {
        let (ours, theirs) = (self.cell_count(), other.cell_count());
        if ours != theirs {
            return Ok(if ours < theirs { -1 } else { 1 });
        }
        for i in 0..ours {
            let (a, b) = (self.cell_at(i)?, other.cell_at(i)?);
            let result = if a.is_null() && b.is_null() { 0 } else { a.compare(&b) };
            if result != 0 {
                return Ok(result);
            }
        }
        Ok(0)
    }
}

impl<T: Tuple + ?Sized> Tuple for &T {
    fn cell_count(&self) -> usize {
        (**self).cell_count()
    }
    fn cell_at(&self, index: usize) -> Result<Value> {
        (**self).cell_at(index)
    }
    fn spec_at(&self, index: usize) -> Result<TupleCellSpec> {
        (**self).spec_at(index)
    }
    fn find_cell(&self, spec: &TupleCellSpec) -> Result<Value> {
        (**self).find_cell(spec)
    }
    fn raw_rid(&self) -> Option<Rid> {
        (**self).raw_rid()
    }
    fn raw_table_name(&self) -> Option<&str> {
        (**self).raw_table_name()
    }
}

impl<T: Tuple + ?Sized> Tuple for Box<T> {
    fn cell_count(&self) -> usize {
        (**self).cell_count()
    }
    fn cell_at(&self, index: usize) -> Result<Value> {
        (**self).cell_at(index)
    }
    fn spec_at(&self, index: usize) -> Result<TupleCellSpec> {
        (**self).spec_at(index)
    }
    fn find_cell(&self, spec: &TupleCellSpec) -> Result<Value> {
        (**self).find_cell(spec)
    }
    fn raw_rid(&self) -> Option<Rid> {
        (**self).raw_rid()
    }
    fn raw_table_name(&self) -> Option<&str> {
        (**self).raw_table_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_equals() {
        let a = TupleCellSpec::new("t", "id");
        assert_eq!(a.alias(), "t.id");
        assert!(a.equals(&TupleCellSpec::new("t", "id")));
        assert!(!a.equals(&TupleCellSpec::new("u", "id")));
        assert!(TupleCellSpec::with_alias("sum(x)").equals(&TupleCellSpec::with_alias("sum(x)")));
        assert!(!TupleCellSpec::with_alias("sum(x)").equals(&a));
    }

    #[test]
    fn test_default_to_string_and_compare() {
        let a = ValueListTuple::new(
            vec![Value::Int(1), Value::from("x")],
            vec![TupleCellSpec::new("t", "a"), TupleCellSpec::new("t", "b")],
        );
        let b = ValueListTuple::new(
            vec![Value::Int(1), Value::from("y")],
            vec![TupleCellSpec::new("t", "a"), TupleCellSpec::new("t", "b")],
        );
        assert_eq!(a.to_string(), "1, x");
        assert_eq!(a.compare(&b).unwrap(), -1);
        assert_eq!(b.compare(&a).unwrap(), 1);
        assert_eq!(a.compare(&a).unwrap(), 0);

        let short = ValueListTuple::new(vec![Value::Int(9)], vec![TupleCellSpec::new("t", "a")]);
        assert_eq!(short.compare(&a).unwrap(), -1);
    }

    #[test]
    fn test_nulls_group_together() {
        let spec = vec![TupleCellSpec::new("t", "a")];
        let a = ValueListTuple::new(vec![Value::Null(shoal_core::AttrType::Ints)], spec.clone());
        let b = ValueListTuple::new(vec![Value::Null(shoal_core::AttrType::Ints)], spec);
        assert_eq!(a.compare(&b).unwrap(), 0);
    }
}
