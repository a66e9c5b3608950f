use super::{Tuple, TupleCellSpec};
use shoal_core::{Error, Result, Rid, Value};

/// A tuple that owns its cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueListTuple {
    cells: Vec<Value>,
    specs: Vec<TupleCellSpec>,
    rid: Option<Rid>,
    table_name: Option<String>,
}

impl ValueListTuple {
    pub fn new(cells: Vec<Value>, specs: Vec<TupleCellSpec>) -> Self {
        debug_assert_eq!(cells.len(), specs.len());
        Self {
            cells,
            specs,
            rid: None,
            table_name: None,
        }
    }

    /// Snapshots every cell of `tuple`, keeping its provenance.
    pub fn make(tuple: &dyn Tuple) -> Result<Self> {
        let count = tuple.cell_count();
        let mut cells = Vec::with_capacity(count);
        let mut specs = Vec::with_capacity(count);
        for i in 0..count {
            cells.push(tuple.cell_at(i)?);
            specs.push(tuple.spec_at(i)?);
        }
        Ok(Self {
            cells,
            specs,
            rid: tuple.raw_rid(),
            table_name: tuple.raw_table_name().map(str::to_string),
        })
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Value> {
        self.cells
    }
}

impl Tuple for ValueListTuple {
    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell_at(&self, index: usize) -> Result<Value> {
        self.cells
            .get(index)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("cell {index}")))
    }

    fn spec_at(&self, index: usize) -> Result<TupleCellSpec> {
        self.specs
            .get(index)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("cell spec {index}")))
    }

    fn find_cell(&self, spec: &TupleCellSpec) -> Result<Value> {
        self.specs
            .iter()
            .position(|s| s.equals(spec))
            .map(|i| self.cells[i].clone())
            .ok_or_else(|| Error::not_found(format!("cell {}", spec.alias())))
    }

    fn raw_rid(&self) -> Option<Rid> {
        self.rid
    }

    fn raw_table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }
}
