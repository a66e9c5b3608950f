use crate::operator::PhysicalOperator;
use shoal_core::{AttrType, Error, Result, Value};
use shoal_storage::Trx;
use std::cell::RefCell;
use std::fmt;

/// A scalar subquery over a physical operator producing one column.
///
/// The transaction is bound by `prepare` before the first evaluation; each
/// evaluation runs the operator from scratch.
pub struct SubqueryExpr {
    operator: RefCell<Box<dyn PhysicalOperator>>,
    trx: RefCell<Option<Trx>>,
}

impl SubqueryExpr {
    pub fn new(operator: Box<dyn PhysicalOperator>) -> Self {
        Self {
            operator: RefCell::new(operator),
            trx: RefCell::new(None),
        }
    }

    pub fn prepare(&self, trx: &Trx) {
        *self.trx.borrow_mut() = Some(trx.clone());
    }

    /// Runs the subquery and returns the value of every row.
    pub fn evaluate_rows(&self) -> Result<Vec<Value>> {
        let trx = self
            .trx
            .borrow()
            .clone()
            .ok_or_else(|| Error::internal("subquery evaluated before prepare"))?;
        let mut operator = self.operator.try_borrow_mut().map_err(|_| {
            Error::internal("subquery evaluated re-entrantly")
        })?;

        if let Err(e) = operator.open(&trx) {
            tracing::warn!(rc = %e.rc(), "failed to open subquery operator");
            let _ = operator.close();
            return Err(e);
        }
        let rows = collect_rows(operator.as_mut());
        let closed = operator.close();
        let rows = rows?;
        closed?;
        tracing::trace!(rows = rows.len(), "subquery evaluated");
        Ok(rows)
    }

    /// Scalar value: NULL for no rows, the cell for one row, an error for more.
    pub fn get_value(&self) -> Result<Value> {
        let mut rows = self.evaluate_rows()?;
        match rows.len() {
            0 => Ok(Value::Null(AttrType::Undefined)),
            1 => Ok(rows.remove(0)),
            n => Err(Error::invalid_argument(format!("subquery returned {n} rows, expected at most one"))),
        }
    }
}

fn collect_rows(operator: &mut dyn PhysicalOperator) -> Result<Vec<Value>> {
    let mut rows = Vec::new();
    while operator.next()? {
        let tuple = operator
            .current_tuple()
            .ok_or_else(|| Error::internal("subquery operator produced no tuple"))?;
        if tuple.cell_count() != 1 {
            return Err(Error::invalid_argument(format!(
                "subquery must produce one column, got {}",
                tuple.cell_count()
            )));
        }
        rows.push(tuple.cell_at(0)?);
    }
    Ok(rows)
}

impl fmt::Debug for SubqueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.operator.try_borrow().map(|op| op.kind()).ok();
        f.debug_struct("SubqueryExpr").field("operator", &kind).finish()
    }
}

impl fmt::Display for SubqueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(subquery)")
    }
}
