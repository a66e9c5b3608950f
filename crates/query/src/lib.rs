//! Shoal Query - expressions, tuples and physical operators.
//!
//! This crate provides the execution layer of the Shoal core:
//!
//! - `expr`: expression trees with a row evaluator and a vectorized evaluator
//! - `tuple`: row views, snapshots, projections and joined rows
//! - `chunk`: columnar batches for vectorized evaluation
//! - `operator`: pull-based physical operators (scans, join, update, vector scan)
//! - `config`: executor, storage and logging settings
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust
//! use shoal_core::schema::{FieldMeta, TableMetaBuilder};
//! use shoal_core::{AttrType, Value};
//! use shoal_query::expr::{CompOp, ComparisonExpr, Expression};
//! use shoal_query::operator::{PhysicalOperator, TableScanOperator};
//! use shoal_storage::{ReadWriteMode, Table, Trx};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let meta = TableMetaBuilder::new("t")
//!     .unwrap()
//!     .with_trx_fields()
//!     .add_field(FieldMeta::new("a", AttrType::Ints))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let table = Table::create(meta, dir.path()).unwrap();
//! let trx = Trx::begin();
//! for i in 0..4 {
//!     table.insert_values(&trx, &[Value::Int(i)]).unwrap();
//! }
//!
//! let predicate = Expression::Comparison(ComparisonExpr::new(
//!     CompOp::GreatEqual,
//!     Expression::field("t", "a", AttrType::Ints),
//!     Expression::value(2),
//! ));
//! let mut scan = TableScanOperator::new(table, ReadWriteMode::ReadOnly).with_predicates(vec![predicate]);
//! scan.open(&trx).unwrap();
//! let mut rows = Vec::new();
//! while scan.next().unwrap() {
//!     rows.push(scan.current_tuple().unwrap().to_string());
//! }
//! scan.close().unwrap();
//! assert_eq!(rows, vec!["2", "3"]);
//! ```

pub mod chunk;
pub mod config;
pub mod expr;
pub mod logging;
pub mod operator;
pub mod tuple;

pub use chunk::{Chunk, Column};
pub use config::Config;
pub use expr::Expression;
pub use operator::PhysicalOperator;
pub use tuple::Tuple;
