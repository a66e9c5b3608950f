//! Leaf expressions and casts.

use super::{kernel, Expression};
use crate::chunk::{Chunk, Column, ColumnData};
use crate::tuple::{Tuple, TupleCellSpec};
use shoal_core::schema::FieldMeta;
use shoal_core::{AttrType, Error, Result, Value};
use std::fmt;

/// Reference to a table field.
#[derive(Clone, Debug)]
pub struct FieldExpr {
    table_name: String,
    field_name: String,
    attr_type: AttrType,
    field_id: Option<usize>,
    /// Column of the input chunk, once bound.
    pos: Option<usize>,
}

impl FieldExpr {
    pub fn new(table_name: impl Into<String>, field_name: impl Into<String>, attr_type: AttrType) -> Self {
        Self {
            table_name: table_name.into(),
            field_name: field_name.into(),
            attr_type,
            field_id: None,
            pos: None,
        }
    }

    /// Field of a table schema; chunk columns default to the field id.
    pub fn from_meta(table_name: impl Into<String>, field: &FieldMeta) -> Self {
        Self {
            field_id: Some(field.field_id()),
            ..Self::new(table_name, field.name(), field.attr_type())
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn value_type(&self) -> AttrType {
        self.attr_type
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = Some(pos);
    }

    pub fn spec(&self) -> TupleCellSpec {
        TupleCellSpec::new(&self.table_name, &self.field_name)
    }

    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        tuple.find_cell(&self.spec())
    }

    pub fn get_column(&self, chunk: &Chunk) -> Result<Column> {
        let index = self
            .pos
            .or(self.field_id)
            .ok_or_else(|| Error::internal(format!("field {self} is not bound to a chunk column")))?;
        let mut column = Column::with_capacity(self.attr_type, 0, 0);
        column.reference(chunk.column(index)?);
        Ok(column)
    }

    pub fn equal(&self, other: &FieldExpr) -> bool {
        self.table_name == other.table_name && self.field_name == other.field_name
    }
}

impl fmt::Display for FieldExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.table_name.is_empty() {
            f.write_str(&self.field_name)
        } else {
            write!(f, "{}.{}", self.table_name, self.field_name)
        }
    }
}

/// A literal.
#[derive(Clone, Debug)]
pub struct ValueExpr {
    value: Value,
}

impl ValueExpr {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn get_column(&self) -> Column {
        Column::constant(&self.value)
    }

    pub fn equal(&self, other: &ValueExpr) -> bool {
        self.value.compare(&other.value) == 0
    }
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Conversion of a child value to another type.
#[derive(Debug)]
pub struct CastExpr {
    child: Box<Expression>,
    cast_type: AttrType,
}

impl CastExpr {
    pub fn new(child: Expression, cast_type: AttrType) -> Self {
        Self {
            child: Box::new(child),
            cast_type,
        }
    }

    pub fn child(&self) -> &Expression {
        &self.child
    }

    pub fn cast_type(&self) -> AttrType {
        self.cast_type
    }

    fn cast(&self, value: Value) -> Result<Value> {
        if value.attr_type() == self.cast_type {
            return Ok(value);
        }
        value.cast_to(self.cast_type)
    }

    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        self.cast(self.child.get_value(tuple)?)
    }

    pub fn try_get_value(&self) -> Result<Value> {
        self.cast(self.child.try_get_value()?)
    }

    /// Only INTS and FLOATS convert in batch.
    pub fn get_column(&self, chunk: &Chunk) -> Result<Column> {
        let column = self.child.get_column(chunk)?;
        if column.attr_type() == self.cast_type {
            return Ok(column);
        }
        kernel::check_no_nulls(&column)?;
        let data = match (column.data(), self.cast_type) {
            (ColumnData::Ints(v), AttrType::Floats) => ColumnData::Floats(v.iter().map(|&a| a as f32).collect()),
            (ColumnData::Floats(v), AttrType::Ints) => ColumnData::Ints(v.iter().map(|&a| a as i32).collect()),
            _ => {
                return Err(Error::unimplemented(format!(
                    "vectorized cast from {} to {}",
                    column.attr_type(),
                    self.cast_type
                )))
            }
        };
        Ok(Column::from_data(self.cast_type, 4, column.kind(), data))
    }
}

impl fmt::Display for CastExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cast({} as {})", self.child, self.cast_type)
    }
}
