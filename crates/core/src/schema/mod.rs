//! Schema module for Shoal.
//!
//! Field and table definitions, including the physical record layout.

mod field;
mod table;

pub use field::{FieldMeta, DEFAULT_CHARS_LEN};
pub use table::{TableMeta, TableMetaBuilder, TRX_BEGIN_FIELD, TRX_END_FIELD};
