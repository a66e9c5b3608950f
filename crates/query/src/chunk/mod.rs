//! Columnar batches for vectorized evaluation.

mod column;

pub use column::{Column, ColumnData, ColumnKind};

use shoal_core::{Error, Result};

/// An ordered set of columns holding the same rows.
#[derive(Clone, Debug, Default)]
pub struct Chunk {
    columns: Vec<Column>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> Result<&Column> {
        self.columns
            .get(index)
            .ok_or_else(|| Error::internal(format!("chunk has no column {index}")))
    }

    pub fn column_mut(&mut self, index: usize) -> Result<&mut Column> {
        self.columns
            .get_mut(index)
            .ok_or_else(|| Error::internal(format!("chunk has no column {index}")))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Row count: the longest normal column, or 1 if every column is
    /// constant.
    pub fn rows(&self) -> usize {
        let normal = self.columns.iter().filter(|c| !c.is_constant()).map(Column::count).max();
        match normal {
            Some(rows) => rows,
            None if self.columns.is_empty() => 0,
            None => 1,
        }
    }

    /// Smallest capacity of the normal columns.
    pub fn capacity(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| !c.is_constant())
            .map(Column::capacity)
            .min()
            .unwrap_or(0)
    }

    /// Drops every row, keeping column types and capacities.
    pub fn reset(&mut self) {
        for column in &mut self.columns {
            column.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_core::{AttrType, Value};

    #[test]
    fn test_rows_and_reset() {
        let mut chunk = Chunk::new();
        assert_eq!(chunk.rows(), 0);
        chunk.add_column(Column::constant(&Value::Int(1)));
        assert_eq!(chunk.rows(), 1);

        let mut ints = Column::with_capacity(AttrType::Ints, 4, 8);
        for i in 0..3 {
            ints.append_value(&Value::Int(i)).unwrap();
        }
        chunk.add_column(ints);
        assert_eq!(chunk.rows(), 3);
        assert_eq!(chunk.capacity(), 8);

        chunk.reset();
        assert_eq!(chunk.rows(), 0);
        assert_eq!(chunk.column(1).unwrap().attr_type(), AttrType::Ints);
        assert!(chunk.column(2).is_err());
    }
}
