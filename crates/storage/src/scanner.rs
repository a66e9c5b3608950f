//! Record scanner.

use crate::table::Table;
use crate::trx::Trx;
use shoal_core::{Record, Result, Rid};
use std::rc::Rc;

/// Cursor over the records of a table visible to a transaction.
///
/// The set of rids is fixed when the scanner is opened; records inserted
/// afterwards are not visited and records deleted afterwards are skipped.
pub struct RecordScanner {
    table: Rc<Table>,
    trx: Trx,
    rids: Vec<Rid>,
    pos: usize,
    closed: bool,
}

impl RecordScanner {
    pub(crate) fn new(table: Rc<Table>, trx: Trx, rids: Vec<Rid>) -> Self {
        Self {
            table,
            trx,
            rids,
            pos: 0,
            closed: false,
        }
    }

    /// Copies the next visible record into `record`. Returns `Ok(false)` at
    /// the end of the table.
    pub fn next(&mut self, record: &mut Record) -> Result<bool> {
        if self.closed {
            return Ok(false);
        }
        let heap = self.table.heap();
        while let Some(&rid) = self.rids.get(self.pos) {
            self.pos += 1;
            let Some(data) = heap.get(rid) else {
                continue;
            };
            if let Some((begin, end)) = self.table.layout().trx_stamps(data) {
                if !self.trx.is_visible(begin, end)? {
                    tracing::trace!(table = self.table.name(), %rid, begin, end, "record not visible");
                    continue;
                }
            }
            record.set_rid(rid);
            record.copy_data_from(data);
            return Ok(true);
        }
        Ok(false)
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            tracing::debug!(table = self.table.name(), visited = self.pos, "record scanner closed");
        }
    }

    pub fn table(&self) -> &Rc<Table> {
        &self.table
    }
}
