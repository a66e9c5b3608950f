use super::{Tuple, TupleCellSpec};
use shoal_core::{Error, Result, Value};

/// Concatenation of two tuples, left cells first.
///
/// Both sides are usually references or boxed views; nothing is copied.
pub struct JoinedTuple<L, R> {
    left: L,
    right: R,
}

impl<L: Tuple, R: Tuple> JoinedTuple<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> &L {
        &self.left
    }

    pub fn right(&self) -> &R {
        &self.right
    }
}

impl<L: Tuple, R: Tuple> Tuple for JoinedTuple<L, R> {
    fn cell_count(&self) -> usize {
        self.left.cell_count() + self.right.cell_count()
    }

    fn cell_at(&self, index: usize) -> Result<Value> {
        let left = self.left.cell_count();
        if index < left {
            return self.left.cell_at(index);
        }
        if index < left + self.right.cell_count() {
            return self.right.cell_at(index - left);
        }
        Err(Error::not_found(format!("cell {index}")))
    }

    fn spec_at(&self, index: usize) -> Result<TupleCellSpec> {
        let left = self.left.cell_count();
        if index < left {
            return self.left.spec_at(index);
        }
        if index < left + self.right.cell_count() {
            return self.right.spec_at(index - left);
        }
        Err(Error::not_found(format!("cell spec {index}")))
    }

    /// Probes the left side first; only a miss falls through to the right.
    fn find_cell(&self, spec: &TupleCellSpec) -> Result<Value> {
        match self.left.find_cell(spec) {
            Err(e) if e.is_not_found() => self.right.find_cell(spec),
            other => other,
        }
    }
}
