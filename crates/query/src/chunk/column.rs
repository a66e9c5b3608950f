use shoal_core::{AttrType, Error, Result, Value};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// One value standing for every row.
    Constant,
    Normal,
}

/// Column storage. INTS, FLOATS and BOOLEANS are kept unboxed for the
/// vectorized kernels; every other type is kept as values.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Ints(Vec<i32>),
    Floats(Vec<f32>),
    Bools(Vec<bool>),
    Values(Vec<Value>),
}

impl ColumnData {
    fn for_type(attr_type: AttrType, capacity: usize) -> Self {
        match attr_type {
            AttrType::Ints => ColumnData::Ints(Vec::with_capacity(capacity)),
            AttrType::Floats => ColumnData::Floats(Vec::with_capacity(capacity)),
            AttrType::Booleans => ColumnData::Bools(Vec::with_capacity(capacity)),
            _ => ColumnData::Values(Vec::with_capacity(capacity)),
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnData::Ints(v) => v.len(),
            ColumnData::Floats(v) => v.len(),
            ColumnData::Bools(v) => v.len(),
            ColumnData::Values(v) => v.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            ColumnData::Ints(v) => v.clear(),
            ColumnData::Floats(v) => v.clear(),
            ColumnData::Bools(v) => v.clear(),
            ColumnData::Values(v) => v.clear(),
        }
    }
}

/// A column of a chunk.
///
/// The buffer is shared between columns created by `reference`; writing to a
/// shared buffer copies it first.
#[derive(Clone, Debug)]
pub struct Column {
    attr_type: AttrType,
    attr_len: usize,
    kind: ColumnKind,
    data: Rc<ColumnData>,
    /// NULL flags, only allocated once a NULL is appended.
    nulls: Option<Rc<Vec<bool>>>,
    capacity: usize,
}

impl Column {
    /// A constant column holding `value`.
    pub fn constant(value: &Value) -> Self {
        let attr_type = value.attr_type();
        let data = match value {
            Value::Int(v) => ColumnData::Ints(vec![*v]),
            Value::Float(v) => ColumnData::Floats(vec![*v]),
            Value::Bool(v) => ColumnData::Bools(vec![*v]),
            other => ColumnData::Values(vec![other.clone()]),
        };
        Self {
            attr_type,
            attr_len: value.length(),
            kind: ColumnKind::Constant,
            data: Rc::new(data),
            nulls: value.is_null().then(|| Rc::new(vec![true])),
            capacity: 1,
        }
    }

    /// An empty normal column.
    pub fn with_capacity(attr_type: AttrType, attr_len: usize, capacity: usize) -> Self {
        Self {
            attr_type,
            attr_len,
            kind: ColumnKind::Normal,
            data: Rc::new(ColumnData::for_type(attr_type, capacity)),
            nulls: None,
            capacity,
        }
    }

    /// A normal column over computed data.
    pub(crate) fn from_data(attr_type: AttrType, attr_len: usize, kind: ColumnKind, data: ColumnData) -> Self {
        let capacity = data.len();
        Self {
            attr_type,
            attr_len,
            kind,
            data: Rc::new(data),
            nulls: None,
            capacity,
        }
    }

    /// Makes this column share `other`'s buffer.
    pub fn reference(&mut self, other: &Column) {
        *self = other.clone();
    }

    #[inline]
    pub fn attr_type(&self) -> AttrType {
        self.attr_type
    }

    #[inline]
    pub fn attr_len(&self) -> usize {
        self.attr_len
    }

    #[inline]
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.kind == ColumnKind::Constant
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn has_nulls(&self) -> bool {
        self.nulls.as_ref().map_or(false, |n| n.iter().any(|b| *b))
    }

    pub fn ints(&self) -> Option<&[i32]> {
        match &*self.data {
            ColumnData::Ints(v) => Some(v),
            _ => None,
        }
    }

    pub fn floats(&self) -> Option<&[f32]> {
        match &*self.data {
            ColumnData::Floats(v) => Some(v),
            _ => None,
        }
    }

    pub fn bools(&self) -> Option<&[bool]> {
        match &*self.data {
            ColumnData::Bools(v) => Some(v),
            _ => None,
        }
    }

    /// Appends one row. The value is cast to the column type; a NULL keeps
    /// a zero slot and is flagged.
    pub fn append_value(&mut self, value: &Value) -> Result<()> {
        if self.is_constant() {
            return Err(Error::internal("cannot append to a constant column"));
        }
        let row = self.count();
        if row >= self.capacity {
            return Err(Error::internal(format!("column is full at {} rows", self.capacity)));
        }
        let value = if value.is_null() || value.attr_type() == self.attr_type {
            value.clone()
        } else {
            value.cast_to(self.attr_type)?
        };
        let null = value.is_null();
        match Rc::make_mut(&mut self.data) {
            ColumnData::Ints(v) => v.push(if null { 0 } else { value.get_int() }),
            ColumnData::Floats(v) => v.push(if null { 0.0 } else { value.get_float() }),
            ColumnData::Bools(v) => v.push(!null && value.get_boolean()),
            ColumnData::Values(v) => v.push(value),
        }
        if null || self.nulls.is_some() {
            let nulls = Rc::make_mut(self.nulls.get_or_insert_with(|| Rc::new(vec![false; row])));
            nulls.push(null);
        }
        Ok(())
    }

    /// Value of row `index`. A constant column answers for any row.
    pub fn get_value(&self, index: usize) -> Result<Value> {
        let index = if self.is_constant() { 0 } else { index };
        if index >= self.count() {
            return Err(Error::invalid_argument(format!(
                "row {index} out of range for column of {} rows",
                self.count()
            )));
        }
        if self.nulls.as_ref().map_or(false, |n| n[index]) {
            return Ok(Value::Null(self.attr_type));
        }
        Ok(match &*self.data {
            ColumnData::Ints(v) => Value::Int(v[index]),
            ColumnData::Floats(v) => Value::Float(v[index]),
            ColumnData::Bools(v) => Value::Bool(v[index]),
            ColumnData::Values(v) => v[index].clone(),
        })
    }

    pub(crate) fn reset(&mut self) {
        if self.is_constant() {
            return;
        }
        Rc::make_mut(&mut self.data).clear();
        self.nulls = None;
    }
}
