use super::{OperatorKind, PhysicalOperator};
use crate::config::ExecutorConfig;
use crate::chunk::{Chunk, Column};
use crate::expr::Expression;
use crate::tuple::{RowTuple, Tuple};
use shoal_core::{Error, Record, Result};
use shoal_storage::{ReadWriteMode, RecordScanner, Table, Trx};
use std::rc::Rc;

/// Full scan of a table with pushed-down predicates.
///
/// Predicates are ANDed unless OR mode is set, in which case a row passes as
/// soon as one predicate holds. Both modes stop at the first deciding
/// predicate.
pub struct TableScanOperator {
    table: Rc<Table>,
    mode: ReadWriteMode,
    predicates: Vec<Expression>,
    or_conjunction: bool,
    chunk_capacity: usize,
    scanner: Option<RecordScanner>,
    current: Record,
    has_current: bool,
}

impl TableScanOperator {
    pub fn new(table: Rc<Table>, mode: ReadWriteMode) -> Self {
        Self {
            table,
            mode,
            predicates: Vec::new(),
            or_conjunction: false,
            chunk_capacity: ExecutorConfig::default().chunk_capacity,
            scanner: None,
            current: Record::default(),
            has_current: false,
        }
    }

    /// Scan whose chunks hold `config.chunk_capacity` rows.
    pub fn with_config(table: Rc<Table>, mode: ReadWriteMode, config: &ExecutorConfig) -> Self {
        let mut scan = Self::new(table, mode);
        scan.set_chunk_capacity(config.chunk_capacity);
        scan
    }

    pub fn with_predicates(mut self, predicates: Vec<Expression>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn set_predicates(&mut self, predicates: Vec<Expression>) {
        self.predicates = predicates;
    }

    pub fn set_or_conjunction(&mut self, or_conjunction: bool) {
        self.or_conjunction = or_conjunction;
    }

    /// Rows per chunk when the scan allocates the chunk columns itself.
    pub fn set_chunk_capacity(&mut self, capacity: usize) {
        self.chunk_capacity = capacity.max(1);
    }

    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    pub fn table(&self) -> &Rc<Table> {
        &self.table
    }

    /// Advances the scanner to the next row passing the predicates.
    fn fetch(&mut self) -> Result<bool> {
        let Some(scanner) = self.scanner.as_mut() else {
            return Err(Error::internal(format!("scan of {} used before open", self.table.name())));
        };
        while scanner.next(&mut self.current)? {
            tracing::trace!(table = self.table.name(), rid = %self.current.rid(), "got a record");
            let tuple = RowTuple::new(self.table.layout(), &self.current);
            let passed = match filter(&self.predicates, self.or_conjunction, &tuple) {
                Ok(passed) => passed,
                Err(e) => {
                    tracing::trace!(rc = %e.rc(), "record filter failed");
                    return Err(e);
                }
            };
            if passed {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Fills `chunk` with up to its capacity of rows passing the predicates,
    /// one column per user field. An empty chunk gets its columns allocated
    /// first. Returns false once the table is exhausted and nothing was added.
    pub fn next_chunk(&mut self, chunk: &mut Chunk) -> Result<bool> {
        let fields = self.table.meta().fields().to_vec();
        if chunk.column_count() == 0 {
            for field in &fields {
                chunk.add_column(Column::with_capacity(field.attr_type(), field.field_len(), self.chunk_capacity));
            }
        } else if chunk.column_count() != fields.len() {
            return Err(Error::internal(format!(
                "chunk has {} columns, table {} has {} fields",
                chunk.column_count(),
                self.table.name(),
                fields.len()
            )));
        }
        chunk.reset();

        let capacity = chunk.capacity();
        let mut rows = 0;
        while rows < capacity && self.fetch()? {
            for (i, field) in fields.iter().enumerate() {
                let value = self.table.layout().read_field(self.current.data(), field)?;
                chunk.column_mut(i)?.append_value(&value)?;
            }
            rows += 1;
        }
        self.has_current = false;
        tracing::trace!(table = self.table.name(), rows, "chunk filled");
        Ok(rows > 0)
    }
}

/// Whether `tuple` passes `predicates`, ANDed or ORed.
fn filter(predicates: &[Expression], or_conjunction: bool, tuple: &dyn Tuple) -> Result<bool> {
    let mut has_true = false;
    for predicate in predicates {
        let passed = predicate.get_value(tuple)?.get_boolean();
        match (passed, or_conjunction) {
            (false, false) => return Ok(false),
            (true, true) => return Ok(true),
            (true, false) => has_true = true,
            (false, true) => {}
        }
    }
    Ok(if or_conjunction { has_true } else { true })
}

impl PhysicalOperator for TableScanOperator {
    fn kind(&self) -> OperatorKind {
        OperatorKind::TableScan
    }

    fn open(&mut self, trx: &Trx) -> Result<()> {
        for predicate in &self.predicates {
            predicate.prepare(trx);
        }
        self.scanner = Some(self.table.get_record_scanner(trx, self.mode)?);
        self.has_current = false;
        tracing::debug!(table = self.table.name(), predicates = self.predicates.len(), "table scan opened");
        Ok(())
    }

    fn next(&mut self) -> Result<bool> {
        self.has_current = self.fetch()?;
        Ok(self.has_current)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut scanner) = self.scanner.take() {
            scanner.close();
        }
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
