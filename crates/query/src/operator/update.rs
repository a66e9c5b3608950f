use super::{OperatorKind, PhysicalOperator};
use crate::expr::Expression;
use crate::tuple::{RowTuple, Tuple};
use shoal_core::schema::FieldMeta;
use shoal_core::{AttrType, Error, Record, Result, Rid, Value};
use shoal_storage::{ReadWriteMode, Table, Trx, View};
use std::rc::Rc;

/// Index maintenance for one rewritten record, run once the child is closed.
struct IndexCommand {
    old: Record,
    new: Vec<u8>,
}

/// `UPDATE ... SET field = expr, ...` over the rows of its child.
///
/// All the work happens in `open`. Every assignment is evaluated against the
/// row as it was before the update, and a record is only rewritten once every
/// new cell passed its checks. Index entries are maintained after the child
/// scan is closed, since the child may be iterating the very index being
/// changed. If any row or index entry fails, every record already rewritten
/// gets its old image back and the indexes are left as they were.
pub struct UpdateOperator {
    table: Rc<Table>,
    assignments: Vec<(FieldMeta, Expression)>,
    child: Box<dyn PhysicalOperator>,
    updated_rows: usize,
}

impl UpdateOperator {
    /// Updates `table`; assignments name the table's fields.
    pub fn new(table: Rc<Table>, assignments: Vec<(String, Expression)>, child: Box<dyn PhysicalOperator>) -> Result<Self> {
        let assignments = assignments
            .into_iter()
            .map(|(name, expr)| Ok((table.meta().require_field(&name)?.clone(), expr)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::resolved(table, assignments, child))
    }

    /// Updates the base table of `view`; assignments name view columns and
    /// are redirected to the base fields they expose.
    pub fn on_view(view: &View, assignments: Vec<(String, Expression)>, child: Box<dyn PhysicalOperator>) -> Result<Self> {
        let assignments = assignments
            .into_iter()
            .map(|(column, expr)| Ok((view.base_field(&column)?.clone(), expr)))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(view = view.name(), table = view.base_table().name(), "update through view");
        Ok(Self::resolved(Rc::clone(view.base_table()), assignments, child))
    }

    fn resolved(table: Rc<Table>, assignments: Vec<(FieldMeta, Expression)>, child: Box<dyn PhysicalOperator>) -> Self {
        Self {
            table,
            assignments,
            child,
            updated_rows: 0,
        }
    }

    pub fn table(&self) -> &Rc<Table> {
        &self.table
    }

    /// Rows rewritten by the last `open`.
    pub fn updated_rows(&self) -> usize {
        self.updated_rows
    }

    fn maintain_indexes(&self, commands: &[IndexCommand]) -> Result<()> {
        if !self.table.has_indexes() || commands.is_empty() {
            return Ok(());
        }
        let fields: Vec<FieldMeta> = self.assignments.iter().map(|(f, _)| f.clone()).collect();
        for command in commands {
            if let Err(e) = self.table.update_index(&command.old, &command.new, &fields) {
                tracing::warn!(rid = %command.old.rid(), rc = %e.rc(), "update index failed");
                self.table.index_discard_cached_entries();
                return Err(e);
            }
        }
        self.table.index_flush_cached_entries()
    }

    /// Writes the pre-update images back, newest first.
    fn restore_records(&self, commands: &[IndexCommand]) {
        for command in commands.iter().rev() {
            let rid = command.old.rid();
            let restored = self.table.visit_record(rid, |record| {
                record.copy_from(&command.old);
                Ok(())
            });
            if let Err(e) = restored {
                tracing::warn!(%rid, rc = %e.rc(), "failed to restore record after update error");
            }
        }
        tracing::debug!(table = self.table.name(), records = commands.len(), "update rolled back");
    }
}

/// Evaluates every assignment for one row and checks the results against
/// the target fields.
fn compute_cells(assignments: &[(FieldMeta, Expression)], tuple: &dyn Tuple) -> Result<Vec<Value>> {
    let mut cells = Vec::with_capacity(assignments.len());
    for (field, expr) in assignments {
        let value = match expr {
            Expression::Subquery(subquery) => {
                let mut rows = subquery.evaluate_rows()?;
                if rows.len() != 1 {
                    tracing::warn!(field = field.name(), rows = rows.len(), "subquery assignment must return one row");
                    return Err(Error::invalid_argument(format!(
                        "subquery for field {} returned {} rows",
                        field.name(),
                        rows.len()
                    )));
                }
                rows.remove(0)
            }
            _ => expr.get_value(tuple).map_err(|e| {
                tracing::warn!(field = field.name(), rc = %e.rc(), "cannot get value from expression");
                e
            })?,
        };
        cells.push(check_cell(field, value)?);
    }
    Ok(cells)
}

fn check_cell(field: &FieldMeta, value: Value) -> Result<Value> {
    if value.is_null() {
        if !field.is_nullable() {
            tracing::warn!(field = field.name(), "field is not nullable, but the value is null");
            return Err(Error::invalid_argument(format!("field {} is not nullable", field.name())));
        }
        return Ok(Value::Null(field.attr_type()));
    }
    let value = if value.attr_type() == field.attr_type() {
        value
    } else {
        value.cast_to(field.attr_type()).map_err(|e| {
            tracing::warn!(from = %value.attr_type(), to = %field.attr_type(), rc = %e.rc(), "cannot cast value");
            Error::invalid_argument(format!(
                "cannot assign {} to {} field {}",
                value.attr_type(),
                field.attr_type(),
                field.name()
            ))
        })?
    };
    if field.attr_type() == AttrType::Vectors {
        if let (Some(dim), Some(v)) = (field.vector_dim(), value.get_vector()) {
            if v.len() != dim {
                return Err(Error::invalid_argument(format!(
                    "field {} holds {dim}-dimensional vectors, got {}",
                    field.name(),
                    v.len()
                )));
            }
        }
    }
    Ok(value)
}

fn update_rows(
    table: &Table,
    assignments: &[(FieldMeta, Expression)],
    child: &mut dyn PhysicalOperator,
    commands: &mut Vec<IndexCommand>,
) -> Result<usize> {
    let mut updated = 0;
    while child.next()? {
        let (rid, cells) = {
            let tuple = child
                .current_tuple()
                .ok_or_else(|| Error::internal("update child produced no tuple"))?;
            match tuple.raw_table_name() {
                Some(name) if name == table.name() => {}
                other => {
                    return Err(Error::internal(format!(
                        "update of {} got a row from {:?}",
                        table.name(),
                        other
                    )))
                }
            }
            let rid: Rid = tuple
                .raw_rid()
                .ok_or_else(|| Error::internal("update child produced a row without a record id"))?;
            (rid, compute_cells(assignments, &*tuple)?)
        };

        let mut command = None;
        table.visit_record(rid, |record| {
            let old = record.clone();
            let row = RowTuple::new(table.layout(), &old);
            for ((field, _), cell) in assignments.iter().zip(&cells) {
                row.set_cell_at(field.field_id(), cell, record.data_mut())?;
            }
            command = Some(IndexCommand {
                new: record.data().to_vec(),
                old,
            });
            Ok(())
        })?;
        commands.extend(command);
        updated += 1;
        tracing::trace!(table = table.name(), %rid, "record updated");
    }
    Ok(updated)
}

impl PhysicalOperator for UpdateOperator {
    fn kind(&self) -> OperatorKind {
        OperatorKind::Update
    }

    fn open(&mut self, trx: &Trx) -> Result<()> {
        trx.check_mode(ReadWriteMode::ReadWrite)?;
        self.updated_rows = 0;
        for (_, expr) in &self.assignments {
            expr.prepare(trx);
        }
        if let Err(e) = self.child.open(trx) {
            tracing::warn!(rc = %e.rc(), "child operator open failed");
            let _ = self.child.close();
            return Err(e);
        }

        let mut commands = Vec::new();
        let result = update_rows(&self.table, &self.assignments, self.child.as_mut(), &mut commands);
        let closed = self.child.close();
        let outcome = result
            .and_then(|rows| closed.map(|_| rows))
            .and_then(|rows| self.maintain_indexes(&commands).map(|_| rows));
        match outcome {
            Ok(rows) => self.updated_rows = rows,
            Err(e) => {
                self.restore_records(&commands);
                return Err(e);
            }
        }
        tracing::debug!(table = self.table.name(), rows = self.updated_rows, "update finished");
        Ok(())
    }

    fn next(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn current_tuple(&self) -> Option<Box<dyn Tuple + '_>> {
        None
    }
}
