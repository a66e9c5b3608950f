//! Field codec over record images.
//!
//! A `RowLayout` pairs a table schema with its payload store, which is all a
//! reader needs to turn record bytes into values and back.

use crate::payload::{PayloadStore, TextData, VectorData};
use shoal_core::bitmap::{Bitmap, BitmapMut};
use shoal_core::schema::{FieldMeta, TableMeta, TRX_BEGIN_FIELD, TRX_END_FIELD};
use shoal_core::{AttrType, Error, Result, Value};
use std::rc::Rc;

#[derive(Clone, Debug)]
pub struct RowLayout {
    meta: Rc<TableMeta>,
    payload: Rc<PayloadStore>,
}

impl RowLayout {
    pub fn new(meta: Rc<TableMeta>, payload: Rc<PayloadStore>) -> Self {
        Self { meta, payload }
    }

    #[inline]
    pub fn meta(&self) -> &Rc<TableMeta> {
        &self.meta
    }

    #[inline]
    pub fn payload(&self) -> &Rc<PayloadStore> {
        &self.payload
    }

    #[inline]
    pub fn table_name(&self) -> &str {
        self.meta.name()
    }

    fn check_len(&self, data: &[u8]) -> Result<()> {
        if data.len() < self.meta.record_size() {
            return Err(Error::internal(format!(
                "record of {} bytes is shorter than {} bytes for table {}",
                data.len(),
                self.meta.record_size(),
                self.meta.name()
            )));
        }
        Ok(())
    }

    fn bitmap_range(&self) -> std::ops::Range<usize> {
        let start = self.meta.null_bitmap_start();
        start..start + self.meta.null_bitmap_len()
    }

    /// Returns true if the NULL bit of `field` is set.
    pub fn is_null(&self, data: &[u8], field: &FieldMeta) -> bool {
        data.get(self.bitmap_range())
            .map(|bits| Bitmap::new(bits).get_bit(field.field_id()))
            .unwrap_or(false)
    }

    /// Decodes `field` from a record image.
    ///
    /// A set NULL bit yields a typed NULL without touching the field bytes.
    /// TEXT and VECTOR payloads are read through the payload store.
    pub fn read_field(&self, data: &[u8], field: &FieldMeta) -> Result<Value> {
        self.check_len(data)?;
        if self.is_null(data, field) {
            return Ok(Value::Null(field.attr_type()));
        }
        let bytes = &data[field.offset()..field.offset() + field.field_len()];
        match field.attr_type() {
            AttrType::Texts => {
                let text = self.payload.load_text(&TextData::from_bytes(bytes)?)?;
                Ok(Value::Text(text))
            }
            AttrType::Vectors => {
                let vector = self.payload.load_vector(&VectorData::from_bytes(bytes)?)?;
                Ok(Value::Vector(vector))
            }
            t => Value::from_raw(t, bytes),
        }
    }

    /// Encodes `value` into `field` of a record image.
    ///
    /// The value must already have the field's type. CHARS are clamped to
    /// the last character boundary within the field width. TEXT and VECTOR
    /// payloads are appended to the payload store before the indirection is
    /// written. A NULL only sets the bit.
    pub fn write_field(&self, data: &mut [u8], field: &FieldMeta, value: &Value) -> Result<()> {
        self.check_len(data)?;
        let range = self.bitmap_range();
        if value.is_null() {
            if !field.is_nullable() {
                return Err(Error::invalid_argument(format!(
                    "field {} is not nullable",
                    field.name()
                )));
            }
            BitmapMut::new(&mut data[range]).set_bit(field.field_id());
            return Ok(());
        }
        if value.attr_type() != field.attr_type() {
            return Err(Error::invalid_argument(format!(
                "value of type {} cannot be stored in {} field {}",
                value.attr_type(),
                field.attr_type(),
                field.name()
            )));
        }

        let (offset, len) = (field.offset(), field.field_len());
        match value {
            Value::Chars(s) => {
                let dst = &mut data[offset..offset + len];
                let mut n = s.len().min(len);
                while !s.is_char_boundary(n) {
                    n -= 1;
                }
                dst[..n].copy_from_slice(&s.as_bytes()[..n]);
                dst[n..].fill(0);
            }
            Value::Text(s) => {
                let indirection = self.payload.dump_text(s)?;
                data[offset..offset + len].copy_from_slice(&indirection.to_bytes());
            }
            Value::Vector(v) => {
                if let Some(dim) = field.vector_dim() {
                    if v.len() != dim {
                        return Err(Error::invalid_argument(format!(
                            "vector of dimension {} does not fit field {} of dimension {dim}",
                            v.len(),
                            field.name()
                        )));
                    }
                }
                let indirection = self.payload.dump_vector(v)?;
                data[offset..offset + len].copy_from_slice(&indirection.to_bytes());
            }
            other => {
                let raw = other.raw_bytes();
                data[offset..offset + len].copy_from_slice(&raw[..len]);
            }
        }
        BitmapMut::new(&mut data[range]).clear_bit(field.field_id());
        Ok(())
    }

    /// Begin and end transaction ids of a record, if the table tracks them.
    pub fn trx_stamps(&self, data: &[u8]) -> Option<(i32, i32)> {
        let begin = self.meta.trx_field(TRX_BEGIN_FIELD)?;
        let end = self.meta.trx_field(TRX_END_FIELD)?;
        let read = |f: &FieldMeta| -> Option<i32> {
            let b = data.get(f.offset()..f.offset() + 4)?;
            Some(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        };
        Some((read(begin)?, read(end)?))
    }

    /// Stamps the begin transaction id of a fresh record.
    pub fn stamp_begin(&self, data: &mut [u8], xid: i32) {
        if let Some(begin) = self.meta.trx_field(TRX_BEGIN_FIELD) {
            if let Some(dst) = data.get_mut(begin.offset()..begin.offset() + 4) {
                dst.copy_from_slice(&xid.to_le_bytes());
            }
        }
    }
}
