//! Field definition for table schemas.

use crate::types::AttrType;

/// Declared width of a CHARS field when none is given.
pub const DEFAULT_CHARS_LEN: usize = 4;

/// A field definition in a table schema.
///
/// `offset` and `field_id` are assigned when the owning table is built.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMeta {
    name: String,
    attr_type: AttrType,
    /// Byte offset of the field inside a record.
    offset: usize,
    /// Inline width in bytes.
    len: usize,
    /// Position among the user-visible fields.
    field_id: usize,
    nullable: bool,
    visible: bool,
    /// Declared dimension of a VECTOR field.
    dim: Option<usize>,
}

impl FieldMeta {
    /// Creates a new field definition.
    pub fn new(name: impl Into<String>, attr_type: AttrType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            offset: 0,
            len: attr_type.inline_len().unwrap_or(DEFAULT_CHARS_LEN),
            field_id: 0,
            nullable: false,
            visible: true,
            dim: None,
        }
    }

    /// Sets the declared width. Only meaningful for CHARS.
    pub fn len(mut self, len: usize) -> Self {
        if self.attr_type == AttrType::Chars {
            self.len = len;
        }
        self
    }

    /// Sets whether this field is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets whether this field is visible to queries.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the declared dimension of a VECTOR field.
    pub fn dim(mut self, dim: usize) -> Self {
        self.dim = Some(dim);
        self
    }

    pub(crate) fn placed(mut self, offset: usize, field_id: usize) -> Self {
        self.offset = offset;
        self.field_id = field_id;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn attr_type(&self) -> AttrType {
        self.attr_type
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Inline width in bytes.
    #[inline]
    pub fn field_len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn field_id(&self) -> usize {
        self.field_id
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn vector_dim(&self) -> Option<usize> {
        self.dim
    }
}
