use super::{Tuple, TupleCellSpec};
use crate::expr::Expression;
use shoal_core::{Error, Result, Value};

/// Evaluates a list of expressions over an inner tuple.
pub struct ProjectTuple<'a> {
    expressions: &'a [Expression],
    tuple: Option<&'a dyn Tuple>,
}

impl<'a> ProjectTuple<'a> {
    pub fn new(expressions: &'a [Expression]) -> Self {
        Self {
            expressions,
            tuple: None,
        }
    }

    pub fn set_tuple(&mut self, tuple: &'a dyn Tuple) {
        self.tuple = Some(tuple);
    }

    pub fn expressions(&self) -> &'a [Expression] {
        self.expressions
    }

    fn inner(&self) -> Result<&'a dyn Tuple> {
        self.tuple
            .ok_or_else(|| Error::internal("project tuple is not bound to an input tuple"))
    }
}

impl Tuple for ProjectTuple<'_> {
    fn cell_count(&self) -> usize {
        self.expressions.len()
    }

    fn cell_at(&self, index: usize) -> Result<Value> {
        let expr = self
            .expressions
            .get(index)
            .ok_or_else(|| Error::internal(format!("projection has no cell {index}")))?;
        expr.get_value(self.inner()?)
    }

    fn spec_at(&self, index: usize) -> Result<TupleCellSpec> {
        let expr = self
            .expressions
            .get(index)
            .ok_or_else(|| Error::internal(format!("projection has no cell {index}")))?;
        Ok(TupleCellSpec::with_alias(expr.name()))
    }

    fn find_cell(&self, spec: &TupleCellSpec) -> Result<Value> {
        self.inner()?.find_cell(spec)
    }

    fn raw_rid(&self) -> Option<shoal_core::Rid> {
        self.tuple.and_then(|t| t.raw_rid())
    }

    fn raw_table_name(&self) -> Option<&str> {
        self.tuple.and_then(|t| t.raw_table_name())
    }
}
