//! Predicates: comparisons, conjunctions, IS NULL and LIKE.

use super::{kernel, Expression};
use crate::chunk::{Chunk, Column, ColumnKind};
use crate::tuple::Tuple;
use shoal_core::pattern_match::like;
use shoal_core::{AttrType, Error, Result, Value, INCOMPARABLE};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompOp {
    EqualTo,
    NotEqual,
    LessThan,
    LessEqual,
    GreatThan,
    GreatEqual,
}

impl CompOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompOp::EqualTo => "=",
            CompOp::NotEqual => "<>",
            CompOp::LessThan => "<",
            CompOp::LessEqual => "<=",
            CompOp::GreatThan => ">",
            CompOp::GreatEqual => ">=",
        }
    }

    /// Maps a three-way comparison to the predicate outcome. An incomparable
    /// pair never satisfies any operator.
    #[inline]
    pub fn matches(&self, cmp: i32) -> bool {
        if cmp == INCOMPARABLE {
            return false;
        }
        match self {
            CompOp::EqualTo => cmp == 0,
            CompOp::NotEqual => cmp != 0,
            CompOp::LessThan => cmp < 0,
            CompOp::LessEqual => cmp <= 0,
            CompOp::GreatThan => cmp > 0,
            CompOp::GreatEqual => cmp >= 0,
        }
    }
}

#[derive(Debug)]
pub struct ComparisonExpr {
    comp: CompOp,
    left: Box<Expression>,
    right: Box<Expression>,
}

impl ComparisonExpr {
    pub fn new(comp: CompOp, left: Expression, right: Expression) -> Self {
        Self {
            comp,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn comp(&self) -> CompOp {
        self.comp
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }

    pub fn compare_value(&self, left: &Value, right: &Value) -> bool {
        self.comp.matches(left.compare(right))
    }

    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        let left = self.left.get_value(tuple).map_err(|e| {
            tracing::warn!(rc = %e.rc(), "failed to get value of left expression");
            e
        })?;
        let right = self.right.get_value(tuple).map_err(|e| {
            tracing::warn!(rc = %e.rc(), "failed to get value of right expression");
            e
        })?;
        Ok(Value::Bool(self.compare_value(&left, &right)))
    }

    /// Folds a comparison of two literals.
    pub fn try_get_value(&self) -> Result<Value> {
        match (self.left.as_value(), self.right.as_value()) {
            (Some(l), Some(r)) => Ok(Value::Bool(self.compare_value(l, r))),
            _ => Err(Error::invalid_argument(format!("{self} is not constant"))),
        }
    }

    /// Narrows `select` to the rows of `chunk` satisfying the comparison.
    ///
    /// `select` is grown to the chunk's row count with `true`; rows already
    /// deselected stay deselected.
    pub fn eval(&self, chunk: &Chunk, select: &mut Vec<bool>) -> Result<()> {
        let left = self.left.get_column(chunk)?;
        let right = self.right.get_column(chunk)?;
        let result = kernel::compare_columns(self.comp, &left, &right)?;
        let rows = chunk.rows();
        if select.len() < rows {
            select.resize(rows, true);
        }
        if left.is_constant() && right.is_constant() {
            let pass = result.first().copied().unwrap_or(false);
            select.iter_mut().take(rows).for_each(|s| *s &= pass);
        } else {
            for (s, r) in select.iter_mut().zip(result) {
                *s &= r;
            }
        }
        Ok(())
    }

    pub fn get_column(&self, chunk: &Chunk) -> Result<Column> {
        let left = self.left.get_column(chunk)?;
        let right = self.right.get_column(chunk)?;
        let result = kernel::compare_columns(self.comp, &left, &right)?;
        Ok(kernel::bool_column(kernel::result_kind(&left, &right), result))
    }
}

impl fmt::Display for ComparisonExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, self.comp.symbol(), self.right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConjunctionType {
    And,
    Or,
}

/// AND / OR over any number of predicates, evaluated left to right with
/// short circuit. With no children AND is true and OR is false.
#[derive(Debug)]
pub struct ConjunctionExpr {
    conjunction_type: ConjunctionType,
    children: Vec<Expression>,
}

impl ConjunctionExpr {
    pub fn new(conjunction_type: ConjunctionType, children: Vec<Expression>) -> Self {
        Self {
            conjunction_type,
            children,
        }
    }

    pub fn conjunction_type(&self) -> ConjunctionType {
        self.conjunction_type
    }

    pub fn children(&self) -> &[Expression] {
        &self.children
    }

    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        let is_and = self.conjunction_type == ConjunctionType::And;
        for child in &self.children {
            let value = child.get_value(tuple).map_err(|e| {
                tracing::warn!(rc = %e.rc(), "failed to get value by child expression");
                e
            })?;
            let b = value.get_boolean();
            if b != is_and {
                return Ok(Value::Bool(b));
            }
        }
        Ok(Value::Bool(is_and))
    }

    pub fn get_column(&self, chunk: &Chunk) -> Result<Column> {
        let is_and = self.conjunction_type == ConjunctionType::And;
        let mut acc: Option<Column> = None;
        for child in &self.children {
            let column = child.get_column(chunk)?;
            kernel::check_no_nulls(&column)?;
            let bools = column.bools().ok_or_else(|| {
                Error::unimplemented(format!("vectorized {:?} over {}", self.conjunction_type, column.attr_type()))
            })?;
            acc = Some(match acc {
                None => column.clone(),
                Some(prev) => {
                    kernel::check_rows(&prev, &column)?;
                    let prev_bools = prev.bools().unwrap_or(&[]);
                    let combined = if is_and {
                        kernel::binary(prev_bools, prev.is_constant(), bools, column.is_constant(), |a, b| a && b)
                    } else {
                        kernel::binary(prev_bools, prev.is_constant(), bools, column.is_constant(), |a, b| a || b)
                    };
                    kernel::bool_column(kernel::result_kind(&prev, &column), combined)
                }
            });
        }
        Ok(acc.unwrap_or_else(|| kernel::bool_column(ColumnKind::Constant, vec![is_and])))
    }
}

impl fmt::Display for ConjunctionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = match self.conjunction_type {
            ConjunctionType::And => " AND ",
            ConjunctionType::Or => " OR ",
        };
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{child}")?;
        }
        Ok(())
    }
}

/// `IS NULL` / `IS NOT NULL`.
#[derive(Debug)]
pub struct IsNullExpr {
    negated: bool,
    child: Box<Expression>,
}

impl IsNullExpr {
    pub fn is_null(child: Expression) -> Self {
        Self {
            negated: false,
            child: Box::new(child),
        }
    }

    pub fn is_not_null(child: Expression) -> Self {
        Self {
            negated: true,
            child: Box::new(child),
        }
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn child(&self) -> &Expression {
        &self.child
    }

    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        let value = self.child.get_value(tuple).map_err(|e| {
            tracing::warn!(rc = %e.rc(), "failed to get left value");
            e
        })?;
        Ok(Value::Bool(value.is_null() != self.negated))
    }
}

impl fmt::Display for IsNullExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.negated { "IS NOT NULL" } else { "IS NULL" };
        write!(f, "{} {op}", self.child)
    }
}

/// `LIKE` / `NOT LIKE` over CHARS operands.
#[derive(Debug)]
pub struct LikeExpr {
    negated: bool,
    value: Box<Expression>,
    pattern: Box<Expression>,
}

impl LikeExpr {
    pub fn like(value: Expression, pattern: Expression) -> Self {
        Self {
            negated: false,
            value: Box::new(value),
            pattern: Box::new(pattern),
        }
    }

    pub fn not_like(value: Expression, pattern: Expression) -> Self {
        Self {
            negated: true,
            ..Self::like(value, pattern)
        }
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn value(&self) -> &Expression {
        &self.value
    }

    pub fn pattern(&self) -> &Expression {
        &self.pattern
    }

    /// A NULL operand yields a NULL boolean.
    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        let value = self.value.get_value(tuple)?;
        let pattern = self.pattern.get_value(tuple)?;
        for v in [&value, &pattern] {
            if v.attr_type() != AttrType::Chars {
                tracing::warn!(attr_type = %v.attr_type(), "value type doesn't support like");
                return Err(Error::unimplemented(format!("LIKE over {}", v.attr_type())));
            }
        }
        match (value.as_str(), pattern.as_str()) {
            (Some(s), Some(p)) => Ok(Value::Bool(like(s, p) != self.negated)),
            _ => Ok(Value::Null(AttrType::Booleans)),
        }
    }
}

impl fmt::Display for LikeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.negated { "NOT LIKE" } else { "LIKE" };
        write!(f, "{} {op} {}", self.value, self.pattern)
    }
}
