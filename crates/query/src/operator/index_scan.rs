use super::{OperatorKind, PhysicalOperator};
use crate::tuple::{RowTuple, Tuple};
use shoal_core::{Error, Record, Result, Rid, Value};
use shoal_index::{IndexKey, KeyRange};
use shoal_storage::{Table, Trx};
use std::rc::Rc;

/// Range scan over an ordered secondary index.
///
/// Bounds are values of the index's leading field, each with an inclusive
/// flag; a missing bound is open. Rows come out in key order.
pub struct IndexScanOperator {
    table: Rc<Table>,
    index_name: String,
    low: Option<(Value, bool)>,
    high: Option<(Value, bool)>,
    rids: Vec<Rid>,
    pos: usize,
    trx: Option<Trx>,
    current: Record,
    has_current: bool,
}

impl IndexScanOperator {
    pub fn new(
        table: Rc<Table>,
        index_name: impl Into<String>,
        low: Option<(Value, bool)>,
        high: Option<(Value, bool)>,
    ) -> Self {
        Self {
            table,
            index_name: index_name.into(),
            low,
            high,
            rids: Vec::new(),
            pos: 0,
            trx: None,
            current: Record::default(),
            has_current: false,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn key_range(&self) -> Result<KeyRange<IndexKey>> {
        let index = self
            .table
            .find_index(&self.index_name)
            .ok_or_else(|| Error::not_found(format!("index {} on table {}", self.index_name, self.table.name())))?;
        let leading = index
            .fields
            .first()
            .ok_or_else(|| Error::internal(format!("index {} has no fields", self.index_name)))?;
        let attr_type = self.table.meta().require_field(leading)?.attr_type();

        let bound = |bound: &Option<(Value, bool)>| -> Result<Option<(IndexKey, bool)>> {
            match bound {
                None => Ok(None),
                Some((value, inclusive)) => {
                    let value = if value.is_null() || value.attr_type() == attr_type {
                        value.clone()
                    } else {
                        value.cast_to(attr_type)?
                    };
                    Ok(Some((IndexKey::new(vec![value]), *inclusive)))
                }
            }
        };
        Ok(KeyRange::from_parts(bound(&self.low)?, bound(&self.high)?))
    }
}

impl PhysicalOperator for IndexScanOperator {
    fn kind(&self) -> OperatorKind {
        OperatorKind::IndexScan
    }

    fn open(&mut self, trx: &Trx) -> Result<()> {
        let range = self.key_range()?;
        self.rids = self.table.index_scan(&self.index_name, &range)?;
        self.pos = 0;
        self.has_current = false;
        self.trx = Some(trx.clone());
        tracing::debug!(table = self.table.name(), index = %self.index_name, rids = self.rids.len(), "index scan opened");
        Ok(())
    }

    fn next(&mut self) -> Result<bool> {
        self.has_current = false;
        let trx = self
            .trx
            .as_ref()
            .ok_or_else(|| Error::internal("index scan used before open"))?;
        while let Some(&rid) = self.rids.get(self.pos) {
            self.pos += 1;
            let record = match self.table.get_record(rid) {
                Ok(record) => record,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            };
            if let Some((begin, end)) = self.table.layout().trx_stamps(record.data()) {
                if !trx.is_visible(begin, end)? {
                    continue;
                }
            }
            self.current = record;
            self.has_current = true;
            return Ok(true);
        }
        Ok(false)
    }

    fn close(&mut self) -> Result<()> {
        self.rids.clear();
        self.pos = 0;
        self.has_current = false;
        self.trx = None;
        Ok(())
    }

    fn current_tuple(&self) -> Option<Box<dyn Tuple + '_>> {
        if !self.has_current {
            return None;
        }
        Some(Box::new(RowTuple::new(self.table.layout(), &self.current)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_core::schema::{FieldMeta, TableMetaBuilder};
    use shoal_core::AttrType;

    fn scan(table: &Rc<Table>, low: Option<(Value, bool)>, high: Option<(Value, bool)>) -> Vec<i32> {
        let mut op = IndexScanOperator::new(table.clone(), "idx_a", low, high);
        op.open(&Trx::begin()).unwrap();
        let mut out = Vec::new();
        while op.next().unwrap() {
            out.push(op.current_tuple().unwrap().cell_at(0).unwrap().get_int());
        }
        op.close().unwrap();
        out
    }

    #[test]
    fn test_range_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let meta = TableMetaBuilder::new("t")
            .unwrap()
            .with_trx_fields()
            .add_field(FieldMeta::new("a", AttrType::Ints))
            .unwrap()
            .build()
            .unwrap();
        let table = Table::create(meta, dir.path()).unwrap();
        let trx = Trx::begin();
        for v in [5, 1, 4, 2, 3] {
            table.insert_values(&trx, &[Value::Int(v)]).unwrap();
        }
        table.create_index("idx_a", &["a"], false).unwrap();

        assert_eq!(scan(&table, None, None), vec![1, 2, 3, 4, 5]);
        assert_eq!(scan(&table, Some((Value::Int(2), true)), Some((Value::Int(4), false))), vec![2, 3]);
        assert_eq!(scan(&table, Some((Value::Float(2.5), false)), None), vec![3, 4, 5]);
    }

    #[test]
    fn test_unknown_index() {
        let dir = tempfile::tempdir().unwrap();
        let meta = TableMetaBuilder::new("t")
            .unwrap()
            .add_field(FieldMeta::new("a", AttrType::Ints))
            .unwrap()
            .build()
            .unwrap();
        let table = Table::create(meta, dir.path()).unwrap();
        let mut op = IndexScanOperator::new(table, "nope", None, None);
        assert!(op.open(&Trx::begin()).unwrap_err().is_not_found());
    }
}
