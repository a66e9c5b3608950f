//! Shoal Storage - record storage for the Shoal execution core.
//!
//! This crate provides the storage collaborators the operators drive:
//!
//! - `Table`: record heap, secondary and vector index maintenance
//! - `RecordScanner`: cursor over the records visible to a transaction
//! - `RowLayout`: field codec over record images
//! - `PayloadStore`: append-only files holding TEXT and VECTOR payloads
//! - `Trx`: transaction id, access mode and record visibility
//! - `View`: single-table updatable views
//!
//! # Example
//!
//! ```rust
//! use shoal_core::schema::{FieldMeta, TableMetaBuilder};
//! use shoal_core::{AttrType, Record, Value};
//! use shoal_storage::{ReadWriteMode, Table, Trx};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let meta = TableMetaBuilder::new("users")
//!     .unwrap()
//!     .with_trx_fields()
//!     .add_field(FieldMeta::new("id", AttrType::Ints))
//!     .unwrap()
//!     .add_field(FieldMeta::new("bio", AttrType::Texts).nullable(true))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let table = Table::create(meta, dir.path()).unwrap();
//!
//! let trx = Trx::begin();
//! table.insert_values(&trx, &[Value::Int(1), Value::Text("hello".into())]).unwrap();
//!
//! let mut scanner = table.get_record_scanner(&trx, ReadWriteMode::ReadOnly).unwrap();
//! let mut record = Record::default();
//! assert!(scanner.next(&mut record).unwrap());
//! let bio = table.meta().field("bio").unwrap();
//! assert_eq!(table.layout().read_field(record.data(), bio).unwrap(), Value::Text("hello".into()));
//! scanner.close();
//! ```

pub mod heap;
pub mod layout;
pub mod payload;
pub mod scanner;
pub mod table;
pub mod trx;
pub mod view;

pub use heap::RecordHeap;
pub use layout::RowLayout;
pub use payload::{PayloadStore, TextData, VectorData};
pub use scanner::RecordScanner;
pub use table::{IndexMeta, Table, VectorIndexMeta};
pub use trx::{ReadWriteMode, Trx, TrxId};
pub use view::{View, ViewColumn};
