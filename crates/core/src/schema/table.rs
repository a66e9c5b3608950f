//! Table definition and record layout.
//!
//! A record is laid out as: transaction-control fields, then the NULL bitmap
//! (one bit per user field), then the user fields at consecutive offsets.

use super::field::FieldMeta;
use crate::error::{Error, Result};
use crate::types::AttrType;

/// Name of the hidden field holding the creating transaction id.
pub const TRX_BEGIN_FIELD: &str = "__trx_xid_begin";
/// Name of the hidden field holding the deleting transaction id.
pub const TRX_END_FIELD: &str = "__trx_xid_end";

/// A table definition in the database schema.
#[derive(Clone, Debug, PartialEq)]
pub struct TableMeta {
    name: String,
    trx_fields: Vec<FieldMeta>,
    fields: Vec<FieldMeta>,
    null_bitmap_start: usize,
    null_bitmap_len: usize,
    record_size: usize,
}

impl TableMeta {
    /// Returns the table name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transaction-control fields stored ahead of the NULL bitmap.
    #[inline]
    pub fn trx_fields(&self) -> &[FieldMeta] {
        &self.trx_fields
    }

    /// User fields, indexed by field id.
    #[inline]
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Gets a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Gets a field by name, failing with a schema error.
    pub fn require_field(&self, name: &str) -> Result<&FieldMeta> {
        self.field(name)
            .ok_or_else(|| Error::field_not_exist(&self.name, name))
    }

    #[inline]
    pub fn field_by_id(&self, field_id: usize) -> Option<&FieldMeta> {
        self.fields.get(field_id)
    }

    /// Gets a transaction-control field by name.
    pub fn trx_field(&self, name: &str) -> Option<&FieldMeta> {
        self.trx_fields.iter().find(|f| f.name() == name)
    }

    /// Byte offset of the NULL bitmap inside a record.
    #[inline]
    pub fn null_bitmap_start(&self) -> usize {
        self.null_bitmap_start
    }

    #[inline]
    pub fn null_bitmap_len(&self) -> usize {
        self.null_bitmap_len
    }

    /// Total record size in bytes.
    #[inline]
    pub fn record_size(&self) -> usize {
        self.record_size
    }
}

/// Builder for creating table definitions.
pub struct TableMetaBuilder {
    name: String,
    fields: Vec<FieldMeta>,
    with_trx_fields: bool,
}

impl TableMetaBuilder {
    /// Creates a new table builder.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::check_naming_rules(&name)?;
        Ok(Self {
            name,
            fields: Vec::new(),
            with_trx_fields: false,
        })
    }

    /// Validates a name follows naming rules.
    fn check_naming_rules(name: &str) -> Result<()> {
        let mut chars = name.chars();
        match chars.next() {
            None => return Err(Error::invalid_schema("name cannot be empty")),
            Some(first) if !first.is_ascii_alphabetic() && first != '_' => {
                return Err(Error::invalid_schema(format!(
                    "name must start with letter or underscore: {name}"
                )));
            }
            _ => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::invalid_schema(format!("name contains invalid characters: {name}")));
        }
        Ok(())
    }

    /// Adds a user field.
    pub fn add_field(mut self, field: FieldMeta) -> Result<Self> {
        Self::check_naming_rules(field.name())?;
        if field.name().starts_with("__") {
            return Err(Error::invalid_schema(format!("reserved field name: {}", field.name())));
        }
        if self.fields.iter().any(|f| f.name() == field.name()) {
            return Err(Error::invalid_schema(format!("field already exists: {}", field.name())));
        }
        if field.attr_type() == AttrType::Undefined {
            return Err(Error::invalid_schema(format!("field {} has no type", field.name())));
        }
        if field.field_len() == 0 {
            return Err(Error::invalid_schema(format!("field {} has zero width", field.name())));
        }
        self.fields.push(field);
        Ok(self)
    }

    /// Reserves begin/end transaction id fields ahead of the NULL bitmap.
    pub fn with_trx_fields(mut self) -> Self {
        self.with_trx_fields = true;
        self
    }

    /// Builds the table definition, assigning offsets and field ids.
    pub fn build(self) -> Result<TableMeta> {
        if self.fields.is_empty() {
            return Err(Error::invalid_schema(format!("table {} has no fields", self.name)));
        }

        let mut offset = 0;
        let mut trx_fields = Vec::new();
        if self.with_trx_fields {
            for (i, name) in [TRX_BEGIN_FIELD, TRX_END_FIELD].into_iter().enumerate() {
                let field = FieldMeta::new(name, AttrType::Ints).visible(false).placed(offset, i);
                offset += field.field_len();
                trx_fields.push(field);
            }
        }

        let null_bitmap_start = offset;
        let null_bitmap_len = self.fields.len().div_ceil(8);
        offset += null_bitmap_len;

        let fields = self
            .fields
            .into_iter()
            .enumerate()
            .map(|(field_id, field)| {
                let placed = field.placed(offset, field_id);
                offset += placed.field_len();
                placed
            })
            .collect();

        Ok(TableMeta {
            name: self.name,
            trx_fields,
            fields,
            null_bitmap_start,
            null_bitmap_len,
            record_size: offset,
        })
    }
}
