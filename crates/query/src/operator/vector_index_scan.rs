use super::{OperatorKind, PhysicalOperator};
use crate::expr::Expression;
use crate::tuple::{RowTuple, Tuple};
use shoal_core::{Error, Record, Result, Rid};
use shoal_storage::{Table, Trx};
use std::rc::Rc;

/// k-nearest-neighbour scan through a vector index.
///
/// The query vector comes from a literal expression. Rows are produced
/// closest first.
pub struct VectorIndexScanOperator {
    table: Rc<Table>,
    index_name: String,
    query: Expression,
    limit: usize,
    rids: Vec<Rid>,
    distances: Vec<f32>,
    pos: usize,
    current: Record,
    has_current: bool,
}

impl VectorIndexScanOperator {
    pub fn new(table: Rc<Table>, index_name: impl Into<String>, query: Expression, limit: usize) -> Self {
        Self {
            table,
            index_name: index_name.into(),
            query,
            limit,
            rids: Vec::new(),
            distances: Vec::new(),
            pos: 0,
            current: Record::default(),
            has_current: false,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Distance of the current row to the query vector.
    pub fn current_distance(&self) -> Option<f32> {
        if !self.has_current {
            return None;
        }
        self.distances.get(self.pos.checked_sub(1)?).copied()
    }

    fn query_vector(&self) -> Result<Vec<f32>> {
        let value = self.query.try_get_value()?;
        value.get_vector().map(<[f32]>::to_vec).ok_or_else(|| {
            Error::invalid_argument(format!(
                "vector index scan needs a vector literal, got {}",
                value.attr_type()
            ))
        })
    }
}

impl PhysicalOperator for VectorIndexScanOperator {
    fn kind(&self) -> OperatorKind {
        OperatorKind::VectorIndexScan
    }

    fn open(&mut self, _trx: &Trx) -> Result<()> {
        let vector = self.query_vector()?;
        let limit = self.limit;
        let (rids, distances) = self
            .table
            .with_vector_index(&self.index_name, |index| {
                index.load()?;
                index.query(&vector, limit)
            })
            .map_err(|e| {
                tracing::warn!(index = %self.index_name, rc = %e.rc(), "failed to query vector index");
                e
            })?;
        tracing::debug!(table = self.table.name(), index = %self.index_name, results = rids.len(), "vector index scan opened");
        self.rids = rids;
        self.distances = distances;
        self.pos = 0;
        self.has_current = false;
        Ok(())
    }

    fn next(&mut self) -> Result<bool> {
        self.has_current = false;
        let Some(&rid) = self.rids.get(self.pos) else {
            return Ok(false);
        };
        self.pos += 1;
        self.current = self.table.get_record(rid)?;
        self.has_current = true;
        Ok(true)
    }

    fn close(&mut self) -> Result<()> {
        self.rids.clear();
        self.distances.clear();
        self.pos = 0;
        self.has_current = false;
        Ok(())
    }

    fn current_tuple(&self) -> Option<Box<dyn Tuple + '_>> {
        if !self.has_current {
            return None;
        }
        Some(Box::new(RowTuple::new(self.table.layout(), &self.current)))
    }
}
