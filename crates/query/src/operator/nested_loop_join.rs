use super::{OperatorKind, PhysicalOperator};
use crate::config::ExecutorConfig;
use crate::tuple::{JoinedTuple, Tuple, ValueListTuple};
use shoal_core::{Error, Result};
use shoal_storage::Trx;

/// Block nested-loop join of two children.
///
/// Up to `left_block_size` left rows are snapshotted into an owned block. For
/// every left row of the block the right child is scanned from the start, so
/// the output is left-major: `(l1, r1), (l1, r2), (l2, r1), ...`. The right
/// child is closed and reopened for each restart.
pub struct NestedLoopJoinOperator {
    children: Vec<Box<dyn PhysicalOperator>>,
    left_block_size: usize,
    block: Vec<ValueListTuple>,
    block_index: usize,
    left_open: bool,
    left_exhausted: bool,
    right_open: bool,
    /// The right child is positioned on a row joined with `block[block_index]`.
    has_current: bool,
    trx: Option<Trx>,
}

impl NestedLoopJoinOperator {
    pub fn new(children: Vec<Box<dyn PhysicalOperator>>, left_block_size: usize) -> Self {
        Self {
            children,
            left_block_size: left_block_size.max(1),
            block: Vec::new(),
            block_index: 0,
            left_open: false,
            left_exhausted: false,
            right_open: false,
            has_current: false,
            trx: None,
        }
    }

    /// Join with the block size of `config`.
    pub fn with_config(children: Vec<Box<dyn PhysicalOperator>>, config: &ExecutorConfig) -> Self {
        Self::new(children, config.left_block_size)
    }

    pub fn left_block_size(&self) -> usize {
        self.left_block_size
    }

    fn check_children(&self) -> Result<()> {
        if self.children.len() != 2 {
            tracing::warn!(children = self.children.len(), "nested loop join should have 2 children");
            return Err(Error::internal(format!(
                "nested loop join needs 2 children, got {}",
                self.children.len()
            )));
        }
        Ok(())
    }

    fn load_left_block(&mut self) -> Result<()> {
        self.block.clear();
        self.block_index = 0;
        let left = &mut self.children[0];
        while self.block.len() < self.left_block_size {
            if !left.next()? {
                self.left_exhausted = true;
                break;
            }
            let tuple = left
                .current_tuple()
                .ok_or_else(|| Error::internal("left child produced no tuple"))?;
            self.block.push(ValueListTuple::make(&*tuple)?);
        }
        tracing::trace!(rows = self.block.len(), "left block loaded");
        Ok(())
    }

    fn open_right(&mut self) -> Result<()> {
        let trx = self
            .trx
            .as_ref()
            .ok_or_else(|| Error::internal("nested loop join used before open"))?;
        self.children[1].open(trx)?;
        self.right_open = true;
        Ok(())
    }

    fn close_right(&mut self) -> Result<()> {
        if self.right_open {
            self.right_open = false;
            self.children[1].close()?;
        }
        Ok(())
    }
}

impl PhysicalOperator for NestedLoopJoinOperator {
    fn kind(&self) -> OperatorKind {
        OperatorKind::NestedLoopJoin
    }

    fn open(&mut self, trx: &Trx) -> Result<()> {
        self.check_children()?;
        self.children[0].open(trx)?;
        self.left_open = true;
        self.left_exhausted = false;
        self.block.clear();
        self.block_index = 0;
        self.has_current = false;
        self.trx = Some(trx.clone());
        tracing::debug!(left_block_size = self.left_block_size, "nested loop join opened");
        Ok(())
    }

    fn next(&mut self) -> Result<bool> {
        self.check_children()?;
        self.has_current = false;
        loop {
            if self.block_index < self.block.len() {
                if !self.right_open {
                    self.open_right()?;
                }
                if self.children[1].next()? {
                    self.has_current = true;
                    return Ok(true);
                }
                // right side exhausted for this left row
                self.close_right()?;
                self.block_index += 1;
                continue;
            }
            if self.left_exhausted || !self.left_open {
                return Ok(false);
            }
            self.load_left_block()?;
            if self.block.is_empty() {
                return Ok(false);
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        let mut result = Ok(());
        if self.left_open {
            self.left_open = false;
            if let Err(e) = self.children[0].close() {
                tracing::warn!(rc = %e.rc(), "failed to close left operator");
                result = Err(e);
            }
        }
        if let Err(e) = self.close_right() {
            tracing::warn!(rc = %e.rc(), "failed to close right operator");
            if result.is_ok() {
                result = Err(e);
            }
        }
        self.block.clear();
        self.has_current = false;
        self.trx = None;
        result
    }

    fn current_tuple(&self) -> Option<Box<dyn Tuple + '_>> {
        if !self.has_current {
            return None;
        }
        let left = self.block.get(self.block_index)?;
        let right = self.children.get(1)?.current_tuple()?;
        Some(Box::new(JoinedTuple::new(left, right)))
    }
}
