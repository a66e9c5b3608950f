use super::Expression;
use crate::chunk::{Chunk, Column};
use crate::tuple::{Tuple, TupleCellSpec};
use shoal_core::{AttrType, Error, Result, Value};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregateType {
    Count,
    Sum,
    Avg,
    Max,
    Min,
}

impl AggregateType {
    /// Parses an aggregate function name, ignoring case.
    pub fn type_from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "count" => Ok(AggregateType::Count),
            "sum" => Ok(AggregateType::Sum),
            "avg" => Ok(AggregateType::Avg),
            "max" => Ok(AggregateType::Max),
            "min" => Ok(AggregateType::Min),
            _ => Err(Error::invalid_argument(format!("unknown aggregate function {name}"))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateType::Count => "COUNT",
            AggregateType::Sum => "SUM",
            AggregateType::Avg => "AVG",
            AggregateType::Max => "MAX",
            AggregateType::Min => "MIN",
        }
    }
}

/// An aggregate call.
///
/// Group operators compute the aggregate with [`Aggregator`]s and publish the
/// result as a cell aliased by the rendered call, `SUM(t.a)`, which is what
/// `get_value` looks up.
#[derive(Debug)]
pub struct AggregateExpr {
    aggregate_type: AggregateType,
    child: Box<Expression>,
    pos: Option<usize>,
}

impl AggregateExpr {
    pub fn new(aggregate_type: AggregateType, child: Expression) -> Self {
        Self {
            aggregate_type,
            child: Box::new(child),
            pos: None,
        }
    }

    pub fn aggregate_type(&self) -> AggregateType {
        self.aggregate_type
    }

    pub fn child(&self) -> &Expression {
        &self.child
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = Some(pos);
    }

    pub fn value_type(&self) -> AttrType {
        match self.aggregate_type {
            AggregateType::Count => AttrType::Ints,
            AggregateType::Avg => AttrType::Floats,
            _ => self.child.value_type(),
        }
    }

    pub fn get_value(&self, tuple: &dyn Tuple) -> Result<Value> {
        tuple.find_cell(&TupleCellSpec::with_alias(self.to_string()))
    }

    pub fn get_column(&self, chunk: &Chunk) -> Result<Column> {
        let pos = self
            .pos
            .ok_or_else(|| Error::internal(format!("aggregate {self} is not bound to a chunk column")))?;
        let mut column = Column::with_capacity(self.value_type(), 0, 0);
        column.reference(chunk.column(pos)?);
        Ok(column)
    }

    pub fn create_aggregator(&self) -> Box<dyn Aggregator> {
        create_aggregator(self.aggregate_type, self.value_type())
    }
}

impl fmt::Display for AggregateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.aggregate_type.name(), self.child)
    }
}

/// Running state of one aggregate over one group.
pub trait Aggregator {
    fn accumulate(&mut self, value: &Value) -> Result<()>;

    fn evaluate(&self) -> Result<Value>;
}

/// Builds the aggregator for `aggregate_type` producing `result_type`.
pub fn create_aggregator(aggregate_type: AggregateType, result_type: AttrType) -> Box<dyn Aggregator> {
    match aggregate_type {
        AggregateType::Count => Box::new(CountAggregator::default()),
        AggregateType::Sum => Box::new(SumAggregator::new(result_type)),
        AggregateType::Avg => Box::new(AvgAggregator::default()),
        AggregateType::Max => Box::new(ExtremumAggregator::new(result_type, true)),
        AggregateType::Min => Box::new(ExtremumAggregator::new(result_type, false)),
    }
}

fn require_numeric(function: &str, value: &Value) -> Result<()> {
    if value.attr_type().is_numeric() {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "{function} over {} values",
            value.attr_type()
        )))
    }
}

#[derive(Debug, Default)]
struct CountAggregator {
    count: i32,
}

impl Aggregator for CountAggregator {
    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if !value.is_null() {
            self.count += 1;
        }
        Ok(())
    }

    fn evaluate(&self) -> Result<Value> {
        Ok(Value::Int(self.count))
    }
}

#[derive(Debug)]
struct SumAggregator {
    result_type: AttrType,
    sum: Option<Value>,
}

impl SumAggregator {
    fn new(result_type: AttrType) -> Self {
        let result_type = if result_type == AttrType::Ints { AttrType::Ints } else { AttrType::Floats };
        Self { result_type, sum: None }
    }
}

impl Aggregator for SumAggregator {
    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        require_numeric("SUM", value)?;
        self.sum = Some(match self.sum.take() {
            None => value.cast_to(self.result_type)?,
            Some(sum) => Value::add(&sum, value, self.result_type)?,
        });
        Ok(())
    }

    fn evaluate(&self) -> Result<Value> {
        Ok(self.sum.clone().unwrap_or(Value::Null(self.result_type)))
    }
}

#[derive(Debug, Default)]
struct AvgAggregator {
    sum: f32,
    count: usize,
}

impl Aggregator for AvgAggregator {
    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        require_numeric("AVG", value)?;
        self.sum += value.get_float();
        self.count += 1;
        Ok(())
    }

    fn evaluate(&self) -> Result<Value> {
        if self.count == 0 {
            return Ok(Value::Null(AttrType::Floats));
        }
        Ok(Value::Float(self.sum / self.count as f32))
    }
}

#[derive(Debug)]
struct ExtremumAggregator {
    result_type: AttrType,
    is_max: bool,
    current: Option<Value>,
}

impl ExtremumAggregator {
    fn new(result_type: AttrType, is_max: bool) -> Self {
        Self {
            result_type,
            is_max,
            current: None,
        }
    }
}

impl Aggregator for ExtremumAggregator {
    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        self.current = Some(match self.current.take() {
            None => value.clone(),
            Some(current) if self.is_max => Value::max(&current, value),
            Some(current) => Value::min(&current, value),
        });
        Ok(())
    }

    fn evaluate(&self) -> Result<Value> {
        Ok(self.current.clone().unwrap_or(Value::Null(self.result_type)))
    }
}
