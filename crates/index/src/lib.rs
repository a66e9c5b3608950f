//! Shoal Index - secondary and vector indexes.
//!
//! This crate provides the index structures the storage layer maintains:
//!
//! - `OrderedIndex`: ordered secondary index with point and range scans
//! - `IndexKey`: composite key built from field values
//! - `FlatVectorIndex`: brute-force k-nearest-neighbour index persisted to a file
//! - `DistanceMetric`: L2, cosine and inner-product distances
//!
//! # Example
//!
//! ```rust
//! use shoal_core::Rid;
//! use shoal_index::{KeyRange, OrderedIndex};
//!
//! let mut index: OrderedIndex<i32> = OrderedIndex::new("idx_id", false);
//! index.insert_entry(10, Rid::new(1, 0)).unwrap();
//! index.insert_entry(20, Rid::new(1, 1)).unwrap();
//! index.insert_entry(5, Rid::new(1, 2)).unwrap();
//!
//! // Point query
//! assert_eq!(index.get(&10), vec![Rid::new(1, 0)]);
//!
//! // Range query
//! let rids = index.scan(&KeyRange::from_parts(Some((10, true)), None));
//! assert_eq!(rids, vec![Rid::new(1, 0), Rid::new(1, 1)]);
//! ```

pub mod distance;
pub mod flat;
pub mod key;
pub mod ordered;
pub mod traits;

pub use distance::DistanceMetric;
pub use flat::FlatVectorIndex;
pub use key::IndexKey;
pub use ordered::OrderedIndex;
pub use traits::{KeyRange, VectorIndex};
