use super::{Tuple, TupleCellSpec};
use shoal_core::schema::FieldMeta;
use shoal_core::{Error, Record, Result, Rid, Value};
use shoal_storage::RowLayout;

/// A view of one stored record through its table layout.
///
/// Cells are the table's user fields in declaration order.
#[derive(Clone, Copy, Debug)]
pub struct RowTuple<'a> {
    layout: &'a RowLayout,
    record: &'a Record,
}

impl<'a> RowTuple<'a> {
    pub fn new(layout: &'a RowLayout, record: &'a Record) -> Self {
        Self { layout, record }
    }

    pub fn set_record(&mut self, record: &'a Record) {
        self.record = record;
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }

    pub fn layout(&self) -> &'a RowLayout {
        self.layout
    }

    fn field(&self, index: usize) -> Result<&'a FieldMeta> {
        let fields = self.layout.meta().fields();
        fields.get(index).ok_or_else(|| {
            tracing::warn!(index, cells = fields.len(), "cell index out of range");
            Error::invalid_argument(format!(
                "cell {index} out of range for table {} with {} fields",
                self.layout.table_name(),
                fields.len()
            ))
        })
    }

    /// Writes `value` into cell `index` of `data`, an image of a record of
    /// this tuple's table. The bound record is not touched.
    pub fn set_cell_at(&self, index: usize, value: &Value, data: &mut [u8]) -> Result<()> {
        let field = self.field(index)?;
        self.layout.write_field(data, field, value)
    }
}

impl Tuple for RowTuple<'_> {
    fn cell_count(&self) -> usize {
        self.layout.meta().field_count()
    }

    fn cell_at(&self, index: usize) -> Result<Value> {
        let field = self.field(index)?;
        self.layout.read_field(self.record.data(), field)
    }

    fn spec_at(&self, index: usize) -> Result<TupleCellSpec> {
        let field = self.field(index)?;
        Ok(TupleCellSpec::new(self.layout.table_name(), field.name()))
    }

    fn find_cell(&self, spec: &TupleCellSpec) -> Result<Value> {
        if spec.table_name() != self.layout.table_name() {
            return Err(Error::not_found(format!("table {} in row tuple", spec.table_name())));
        }
        let field = self
            .layout
            .meta()
            .field(spec.field_name())
            .ok_or_else(|| Error::not_found(format!("field {}", spec.alias())))?;
        self.layout.read_field(self.record.data(), field)
    }

    fn raw_rid(&self) -> Option<Rid> {
        Some(self.record.rid())
    }

    fn raw_table_name(&self) -> Option<&str> {
        Some(self.layout.table_name())
    }
}
