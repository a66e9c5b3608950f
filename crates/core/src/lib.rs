//! Shoal Core - value model, type classes and schema definitions.
//!
//! This crate provides the foundational types for the Shoal execution core:
//!
//! - `AttrType`: attribute types (Chars, Ints, Floats, Booleans, Dates, Texts, Vectors)
//! - `Value`: typed runtime values with NULL, comparison, arithmetic and casts
//! - `schema`: field and table definitions, including the record layout
//! - `Rid` / `Record`: physical record identifiers and images
//! - `pattern_match`: SQL LIKE
//! - `Error`: error taxonomy shared by every Shoal crate
//!
//! # Example
//!
//! ```rust
//! use shoal_core::{AttrType, Value};
//! use shoal_core::schema::{FieldMeta, TableMetaBuilder};
//!
//! let meta = TableMetaBuilder::new("users")
//!     .unwrap()
//!     .add_field(FieldMeta::new("id", AttrType::Ints))
//!     .unwrap()
//!     .add_field(FieldMeta::new("name", AttrType::Chars).len(16).nullable(true))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! assert_eq!(meta.field_count(), 2);
//!
//! let sum = Value::add(&Value::Int(1), &Value::Float(0.5), AttrType::Floats).unwrap();
//! assert_eq!(sum, Value::Float(1.5));
//! assert_eq!(Value::date_from_str("2024-1-5").to_string(), "2024-01-05");
//! ```

pub mod bitmap;
mod error;
pub mod pattern_match;
mod record;
pub mod schema;
pub mod types;
mod value;

pub use error::{Error, Rc, Result};
pub use record::{Record, Rid};
pub use types::{ArithOp, AttrType};
pub use value::{Value, EPSILON, INCOMPARABLE};
